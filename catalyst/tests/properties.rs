// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based checks for naming, binding parsing and mark ordering.

use catalyst::{Binding, ClassDescriptor, ClassTable, MarkHandlers, MarkRegistry, attribute_name_for};
use proptest::prelude::*;

proptest! {
    #[test]
    fn attribute_names_are_stable(key in "[A-Za-z0-9]{1,24}") {
        let name = attribute_name_for(&key);
        prop_assert_eq!(&name, &attribute_name_for(&key));
        prop_assert!(name.starts_with("data-"));
        prop_assert_eq!(name.to_lowercase(), name.clone());
        prop_assert!(!name.contains("--"));
        prop_assert_eq!(attribute_name_for(&name["data-".len()..]), name);
    }

    #[test]
    fn well_formed_bindings_round_trip(
        event in "[a-z]{1,8}(:[a-z]{1,6})?",
        tag in "[a-z]{1,6}-[a-z]{1,6}",
        method in "[a-zA-Z]{1,10}",
    ) {
        let token = format!("{event}:{tag}#{method}");
        let binding = Binding::parse(&token).expect("well formed");
        prop_assert_eq!(binding.event_type, event.as_str());
        prop_assert_eq!(binding.tag, tag.as_str());
        prop_assert_eq!(binding.method, method.as_str());
    }

    #[test]
    fn subclass_entries_precede_base_entries(
        base_keys in prop::collection::btree_set("[a-z]{1,6}", 0..6),
        child_keys in prop::collection::btree_set("[A-Z]{1,6}", 0..6),
    ) {
        let mut classes = ClassTable::new();
        let mut registry = MarkRegistry::new();
        let mark = registry.define_mark("m", MarkHandlers::new().on_property(|_, _, _, _| {}));
        let base = classes.define(ClassDescriptor::new("Base")).unwrap();
        let child = classes.define(ClassDescriptor::new("Child").extends(base)).unwrap();
        for k in &base_keys {
            mark.apply(&mut registry, base, k);
        }
        for k in &child_keys {
            mark.apply(&mut registry, child, k);
        }

        let from_base: Vec<_> = registry.properties_to_call(&classes, base, None).collect();
        let from_child: Vec<_> = registry.properties_to_call(&classes, child, None).collect();
        prop_assert_eq!(from_child.len(), child_keys.len() + from_base.len());
        prop_assert_eq!(&from_child[child_keys.len()..], from_base.as_slice());
        for (i, (_, key)) in from_child.iter().take(child_keys.len()).enumerate() {
            prop_assert_eq!(*key, child_keys.iter().nth(i).unwrap().as_str());
        }
    }
}
