// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Propagation paths across a shadow boundary.
//!
//! Prints the capture → target → bubble sequence for a node inside a shadow tree,
//! once composed and once not.
//!
//! Run:
//! - `cargo run -p catalyst_demos --example propagation_paths`

use catalyst_dom::{Dom, DomError, ShadowRootMode};
use catalyst_responder::adapters::dom::DomParents;
use catalyst_responder::router::Router;

fn main() -> Result<(), DomError> {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let host = dom.create_element(doc, "x-host")?;
    dom.append_child(doc, host)?;
    let shadow = dom.attach_shadow(host, ShadowRootMode::Open)?;
    let button = dom.create_element(doc, "button")?;
    dom.append_child(shadow, button)?;

    for (label, parents) in [
        ("composed", DomParents::composed(&dom)),
        ("scoped", DomParents::new(&dom)),
    ] {
        println!("== {label} ==");
        for d in Router::with_parent(parents).route(button) {
            let name = dom.tag_name(d.node).unwrap_or("#root");
            println!("{:?}\t{name}", d.phase);
        }
    }
    Ok(())
}
