use std::{collections::HashMap, hash::Hash};

use crate::component::Instance;

/// Side table from a host node to the component instances that materialized into it.
///
/// A node holds at most one entry. Components that render straight into another component share
/// the node, so the entry lists them outermost first.
pub(crate) struct Attachments<N> {
    entries: HashMap<N, Vec<Instance>>,
}

impl<N> Attachments<N>
where
    N: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Attach `instance` to `node`. Materialization finishes inner components first, so each new
    /// instance goes in front of the ones already there.
    pub fn attach(&mut self, node: N, instance: Instance) {
        self.entries.entry(node).or_default().insert(0, instance);
    }

    pub fn get(&self, node: &N) -> Option<&[Instance]> {
        self.entries.get(node).map(Vec::as_slice)
    }

    /// Remove the entry for `node`, returning its instances.
    pub fn detach(&mut self, node: &N) -> Option<Vec<Instance>> {
        self.entries.remove(node)
    }

    /// Undo the given attachments, removing entries left empty.
    pub fn discard(&mut self, attached: &[(N, Instance)]) {
        for (node, instance) in attached {
            if let Some(instances) = self.entries.get_mut(node) {
                instances.retain(|other| !other.ptr_eq(instance));

                if instances.is_empty() {
                    self.entries.remove(node);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        component::{Component, ComponentType, Scope},
        props,
        value::Value,
    };

    struct Empty;

    impl Component for Empty {
        fn create(_scope: &Scope) -> anyhow::Result<Self> {
            Ok(Self)
        }

        fn render(&self, _scope: &Scope) -> anyhow::Result<Value> {
            Ok(Value::Null)
        }
    }

    fn instance() -> Instance {
        ComponentType::of::<Empty>().instantiate(props! {}).unwrap()
    }

    #[test]
    fn later_attachments_come_first() {
        let mut attachments = Attachments::new();
        let (inner, outer) = (instance(), instance());

        attachments.attach(1, inner.clone());
        attachments.attach(1, outer.clone());

        let attached = attachments.get(&1).unwrap();
        assert!(attached[0].ptr_eq(&outer));
        assert!(attached[1].ptr_eq(&inner));
        assert_eq!(attachments.len(), 1);
    }

    #[test]
    fn detach_removes_the_entry() {
        let mut attachments = Attachments::new();
        attachments.attach(1, instance());

        assert_eq!(attachments.detach(&1).map(|list| list.len()), Some(1));
        assert!(attachments.get(&1).is_none());
        assert!(attachments.detach(&1).is_none());
    }

    #[test]
    fn discard_only_drops_listed_instances() {
        let mut attachments = Attachments::new();
        let (kept, dropped, alone) = (instance(), instance(), instance());

        attachments.attach(1, kept.clone());
        attachments.attach(1, dropped.clone());
        attachments.attach(2, alone.clone());

        attachments.discard(&[(1, dropped), (2, alone)]);

        let remaining = attachments.get(&1).unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].ptr_eq(&kept));
        assert!(attachments.get(&2).is_none());
    }
}
