use std::fmt;

/// Identifier of the world dimension a shape lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DimensionId(pub i32);

impl DimensionId {
    pub const OVERWORLD: Self = Self(0);
    pub const NETHER: Self = Self(1);
    pub const THE_END: Self = Self(2);
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OVERWORLD => f.write_str("overworld"),
            Self::NETHER => f.write_str("nether"),
            Self::THE_END => f.write_str("the_end"),
            Self(id) => write!(f, "dimension#{id}"),
        }
    }
}
