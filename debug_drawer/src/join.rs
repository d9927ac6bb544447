use std::sync::Arc;

use crate::directory::InstanceDirectory;
use crate::dispatch::Dispatcher;
use crate::transport::ClientId;

/// Replays retained geometry to clients that connect after it was drawn.
///
/// One hook serves every handler registered in its [`InstanceDirectory`].
pub struct JoinHook {
    directory: Arc<InstanceDirectory>,
    dispatcher: Dispatcher,
}

impl JoinHook {
    pub fn new(directory: Arc<InstanceDirectory>, dispatcher: Dispatcher) -> Arc<Self> {
        Arc::new(Self {
            directory,
            dispatcher,
        })
    }

    /// Subscribe to client initialization events of the dispatcher's
    /// transport.
    ///
    /// The transport keeps the hook alive for as long as it holds the
    /// callback, so the returned `Arc` may be dropped right away.
    pub fn install(self: &Arc<Self>) {
        let hook = Arc::clone(self);
        self.dispatcher
            .transport()
            .on_client_initialized(Box::new(move |client| {
                hook.handle_client_initialized(client);
            }));
        log::info!("Installed debug draw join hook");
    }

    /// Send every retained packet of every live handler to `client`.
    ///
    /// Fallback-rendered geometry is not replayed. Returns the number of
    /// packets the transport accepted.
    pub fn handle_client_initialized(&self, client: ClientId) -> usize {
        if !self.directory.has_instances() {
            return 0;
        }

        let mut sent = 0;
        let mut attempted = 0;
        let generation = self.directory.visit_registries(|_, registry| {
            registry.for_each_packet(|_, packet| {
                attempted += 1;
                if self.dispatcher.replay_to(client, packet) {
                    sent += 1;
                }
            });
        });
        log::debug!(
            "Replayed {sent}/{attempted} debug packets to client {client} (pass {generation})"
        );
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DebugDrawConfig;
    use crate::handler::DebugDrawHandler;
    use crate::test_support::{init_logging, RecordingFallback, RecordingTransport};
    use shapecast_core::{vec3, Color, DimensionId, Vec3};

    const DIM: DimensionId = DimensionId::OVERWORLD;

    struct Fixture {
        directory: Arc<InstanceDirectory>,
        transport: Arc<RecordingTransport>,
        hook: Arc<JoinHook>,
    }

    impl Fixture {
        fn new() -> Self {
            init_logging();
            let directory = Arc::new(InstanceDirectory::new());
            let transport = Arc::new(RecordingTransport::new());
            let hook = JoinHook::new(directory.clone(), Dispatcher::new(transport.clone()));
            Self {
                directory,
                transport,
                hook,
            }
        }

        fn handler(&self) -> DebugDrawHandler {
            DebugDrawHandler::new(
                self.directory.clone(),
                Dispatcher::new(self.transport.clone()),
                Arc::new(RecordingFallback::new()),
                DebugDrawConfig::default(),
            )
            .unwrap()
        }
    }

    #[test]
    fn test_no_instances_sends_nothing() {
        let fx = Fixture::new();
        assert_eq!(fx.hook.handle_client_initialized(ClientId::new(1, 0)), 0);
        assert!(fx.transport.sent().is_empty());
        // The fast path does not start a pass.
        assert_eq!(fx.directory.generation(), 0);
    }

    #[test]
    fn test_replays_every_packet_of_every_instance_once() {
        let fx = Fixture::new();
        let a = fx.handler();
        let b = fx.handler();

        a.draw_line(DIM, Vec3::zeros(), vec3(0.0, 0.0, 400.0), Color::RED, None);
        a.draw_circle(DIM, Vec3::zeros(), Vec3::y(), 3.0, Color::RED);
        b.draw_sphere(DIM, Vec3::zeros(), 2.0, Color::BLUE, Some(8));
        let broadcasts = fx.transport.broadcasts();
        fx.transport.clear();

        let client = ClientId::new(42, 1);
        assert_eq!(fx.hook.handle_client_initialized(client), 3);

        let mut replayed = fx.transport.sent_to(client);
        assert_eq!(replayed.len(), 3);
        for packet in &broadcasts {
            let pos = replayed.iter().position(|p| p == packet).expect("replayed");
            replayed.swap_remove(pos);
        }
        assert!(fx.transport.broadcasts().is_empty());
    }

    #[test]
    fn test_fallback_geometry_not_replayed() {
        let fx = Fixture::new();
        let handler = fx.handler();
        handler.draw_point(DIM, Vec3::zeros(), Color::WHITE, None);
        handler.draw_line(DIM, Vec3::zeros(), Vec3::x(), Color::WHITE, Some(3.0));

        let client = ClientId::new(7, 0);
        assert_eq!(fx.hook.handle_client_initialized(client), 0);
        assert!(fx.transport.sent_to(client).is_empty());
        assert_eq!(handler.registry().len(), 2);
    }

    #[test]
    fn test_removed_and_dropped_geometry_not_replayed() {
        let fx = Fixture::new();
        let kept = fx.handler();
        let dropped = fx.handler();

        let gone = kept.draw_line(DIM, Vec3::zeros(), Vec3::x(), Color::RED, None);
        kept.draw_line(DIM, Vec3::zeros(), Vec3::y(), Color::GREEN, None);
        dropped.draw_line(DIM, Vec3::zeros(), Vec3::z(), Color::BLUE, None);
        kept.remove(gone);
        drop(dropped);

        let client = ClientId::new(3, 0);
        assert_eq!(fx.hook.handle_client_initialized(client), 1);
        let replayed = fx.transport.sent_to(client);
        assert_eq!(replayed[0].shapes()[0].color, Color::GREEN);
    }

    #[test]
    fn test_install_replays_on_join_event() {
        let fx = Fixture::new();
        let handler = fx.handler();
        handler.draw_box(
            DIM,
            &shapecast_core::Aabb::new(Vec3::zeros(), vec3(1.0, 1.0, 1.0)),
            Color::WHITE,
            None,
        );

        fx.hook.install();
        assert_eq!(fx.transport.join_callback_count(), 1);

        let client = ClientId::new(9, 2);
        fx.transport.fire_join(client);
        assert_eq!(fx.transport.sent_to(client).len(), 1);
        assert_eq!(fx.directory.generation(), 1);
    }

    #[test]
    fn test_installed_hook_outlives_caller_handle() {
        let fx = Fixture::new();
        let handler = fx.handler();
        handler.draw_line(DIM, Vec3::zeros(), Vec3::x(), Color::RED, None);

        // Install and drop the returned handle in one statement.
        JoinHook::new(fx.directory.clone(), Dispatcher::new(fx.transport.clone())).install();

        let client = ClientId::new(1, 1);
        fx.transport.fire_join(client);
        assert_eq!(fx.transport.sent_to(client).len(), 1);
        assert_eq!(fx.directory.generation(), 1);
    }

    #[test]
    fn test_failed_replays_not_counted() {
        init_logging();
        let directory = Arc::new(InstanceDirectory::new());
        let live = Arc::new(RecordingTransport::new());
        let handler = DebugDrawHandler::new(
            directory.clone(),
            Dispatcher::new(live),
            Arc::new(RecordingFallback::new()),
            DebugDrawConfig::default(),
        )
        .unwrap();
        handler.draw_line(DIM, Vec3::zeros(), Vec3::x(), Color::RED, None);

        let hook = JoinHook::new(
            directory,
            Dispatcher::new(Arc::new(RecordingTransport::failing())),
        );
        assert_eq!(hook.handle_client_initialized(ClientId::new(5, 0)), 0);
    }

    #[test]
    fn test_join_during_concurrent_draws_sees_each_packet_at_least_once() {
        let fx = Fixture::new();
        let handler = fx.handler();
        let client = ClientId::new(11, 0);

        std::thread::scope(|s| {
            let handler = &handler;
            s.spawn(move || {
                for i in 0..200 {
                    let end = vec3(i as f32 + 1.0, 0.0, 0.0);
                    handler.draw_line(DIM, Vec3::zeros(), end, Color::RED, None);
                }
            });
            let hook = &fx.hook;
            s.spawn(move || {
                for _ in 0..10 {
                    hook.handle_client_initialized(client);
                }
            });
        });

        // Broadcast happens before retention, so anything retained was also
        // broadcast to every client.
        let broadcasts = fx.transport.broadcasts();
        assert_eq!(broadcasts.len(), 200);
        let mut retained = 0;
        handler.registry().for_each_packet(|_, packet| {
            retained += 1;
            assert!(broadcasts.contains(packet));
        });
        assert_eq!(retained, 200);
    }
}
