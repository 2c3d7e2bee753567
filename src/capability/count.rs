//! The Count: a pure modifier that counts one extra completed city when
//! awards are scored.

use std::any::Any;

use super::{Capability, CapabilityId};
use crate::board::FeatureKind;

#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl Capability for Count {
    fn id(&self) -> CapabilityId {
        CapabilityId::Count
    }

    fn completed_count_bonus(&self, kind: FeatureKind) -> usize {
        usize::from(kind == FeatureKind::City)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
