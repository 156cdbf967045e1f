//! SymbolDecoder trait - noisy observation → symbol decision
//!
//! Knows nothing about channels or statistics. Pure decision logic.

use crate::symbol::{Alphabet, Symbol};

/// Decision algorithm for one trial
///
/// Implementations consume the noisy channel outcome of a single trial and
/// return a symbol of `alphabet()`, or `None` when the observation does not
/// support a decision (zero-power reference, non-finite measurement, ...).
pub trait SymbolDecoder: Send + Sync {
    /// What the receiver measures
    type Observation: ?Sized;

    /// Alphabet every decision is clipped to
    fn alphabet(&self) -> Alphabet;

    /// Decide the transmitted symbol
    ///
    /// # Returns
    /// `Some(symbol)` with `alphabet().contains(symbol)`, or `None` if undefined
    fn decode(&self, observation: &Self::Observation) -> Option<Symbol>;
}
