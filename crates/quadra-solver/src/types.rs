//! Variable and warm-start type tags.

/// Domain tag for a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarType {
    /// Continuous variable (the default).
    #[default]
    Continuous,
    /// General integer variable.
    Integer,
    /// Binary (0/1) variable.
    Binary,
}

impl VarType {
    pub fn as_str(self) -> &'static str {
        match self {
            VarType::Continuous => "continuous",
            VarType::Integer => "integer",
            VarType::Binary => "binary",
        }
    }
}

/// Warm-start policy for the next solve.
///
/// Selects which part of the previous solve's result, if any, should seed
/// the next one. `Default` leaves the choice to the backing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarmStart {
    /// Engine-default behavior (no prior basis before the first solve).
    #[default]
    Default,
    /// Reuse the previous primal solution.
    Primal,
    /// Reuse the previous dual solution.
    Dual,
    /// Start cold, discarding any previous result.
    None,
}

impl WarmStart {
    pub fn as_str(self) -> &'static str {
        match self {
            WarmStart::Default => "default",
            WarmStart::Primal => "primal",
            WarmStart::Dual => "dual",
            WarmStart::None => "none",
        }
    }
}
