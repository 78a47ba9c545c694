//! Transaction component data
//!
//! A wire transaction is a list of component groups plus a privacy salt. The
//! group list is validated against [`ComponentGroupEnum`] on construction, so
//! a `WireTransaction` value always has its groups at their ordinal positions.

use crate::common::errors::ComponentOrderError;
use crate::common::values::{OpaqueBytes, PrivacySalt};
use crate::protocol::component::{validate_component_order, ComponentGroupEnum};

/// One group of serialised components, in stream order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ComponentGroup {
    pub group_index: i32,
    pub components: Vec<OpaqueBytes>,
}

impl ComponentGroup {
    pub fn new(group_index: i32, components: Vec<OpaqueBytes>) -> Self {
        Self {
            group_index,
            components,
        }
    }

    /// The enumerated group this index names, if any
    pub fn kind(&self) -> Option<ComponentGroupEnum> {
        ComponentGroupEnum::from_index(self.group_index)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Transaction as it travels on the wire, before resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireTransaction {
    component_groups: Vec<ComponentGroup>,
    privacy_salt: PrivacySalt,
}

impl WireTransaction {
    /// Build a transaction, rejecting groups that are not at their ordinal positions
    pub fn new(
        component_groups: Vec<ComponentGroup>,
        privacy_salt: PrivacySalt,
    ) -> Result<Self, ComponentOrderError> {
        validate_component_order(&component_groups)?;
        Ok(Self {
            component_groups,
            privacy_salt,
        })
    }

    pub fn component_groups(&self) -> &[ComponentGroup] {
        &self.component_groups
    }

    pub fn privacy_salt(&self) -> &PrivacySalt {
        &self.privacy_salt
    }

    pub fn group(&self, kind: ComponentGroupEnum) -> Option<&ComponentGroup> {
        self.component_groups.get(usize::from(kind.ordinal()))
    }

    /// Components of one group; empty when the group is absent
    pub fn components(&self, kind: ComponentGroupEnum) -> &[OpaqueBytes] {
        self.group(kind)
            .map(|g| g.components.as_slice())
            .unwrap_or(&[])
    }

    pub fn inputs(&self) -> &[OpaqueBytes] {
        self.components(ComponentGroupEnum::Inputs)
    }

    pub fn outputs(&self) -> &[OpaqueBytes] {
        self.components(ComponentGroupEnum::Outputs)
    }

    /// Groups paired with their ordinals, in the order a Merkle builder consumes them
    pub fn ordered_groups(&self) -> Vec<(ComponentGroupEnum, &[OpaqueBytes])> {
        // Construction validated every index, so each group maps to its ordinal
        self.component_groups
            .iter()
            .zip(ComponentGroupEnum::ALL)
            .map(|(group, kind)| (kind, group.components.as_slice()))
            .collect()
    }

    pub fn ordinals(&self) -> Vec<u8> {
        self.ordered_groups()
            .iter()
            .map(|(kind, _)| kind.ordinal())
            .collect()
    }

    pub fn component_count(&self) -> usize {
        self.component_groups.iter().map(ComponentGroup::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_groups() -> Vec<ComponentGroup> {
        (0..8)
            .map(|i| ComponentGroup::new(i, vec![OpaqueBytes::new(vec![i as u8])]))
            .collect()
    }

    #[test]
    fn test_ordered_groups_in_enum_order() {
        let wtx = WireTransaction::new(full_groups(), PrivacySalt::default()).unwrap();

        assert_eq!(wtx.ordinals(), vec![0, 1, 2, 3, 4, 5, 6, 7]);
        let kinds: Vec<ComponentGroupEnum> =
            wtx.ordered_groups().into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, ComponentGroupEnum::ALL.to_vec());
        assert_eq!(wtx.component_count(), 8);
        assert_eq!(wtx.outputs()[0].as_slice(), &[1]);
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut groups = full_groups();
        groups.swap(2, 5);

        let err = WireTransaction::new(groups, PrivacySalt::default()).unwrap_err();
        assert_eq!(
            err,
            ComponentOrderError::OutOfOrder {
                position: 2,
                group_index: 5,
                found: ComponentGroupEnum::TimeWindow,
            }
        );
    }

    #[test]
    fn test_missing_trailing_groups() {
        let groups: Vec<ComponentGroup> = full_groups().into_iter().take(2).collect();
        let wtx = WireTransaction::new(groups, PrivacySalt::default()).unwrap();

        assert!(wtx.group(ComponentGroupEnum::Notary).is_none());
        assert!(wtx.components(ComponentGroupEnum::Signers).is_empty());
        assert_eq!(wtx.ordinals(), vec![0, 1]);
    }
}
