// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Counter.
//!
//! A custom element with an `attr`-backed count, a `target` for its output and two
//! buttons bound with `data-action`. Set `RUST_LOG=catalyst=trace` to watch the
//! runtime wire things up.
//!
//! Run:
//! - `cargo run -p catalyst_demos --example counter`

use catalyst::{ClassDescriptor, Event, Methods, PropValue, Runtime};
use tracing_subscriber::EnvFilter;

fn step(rt: &mut Runtime, this: catalyst_dom::NodeId, by: f64) {
    let n = rt
        .property(this, "count")
        .and_then(|v| v.as_number())
        .unwrap_or(0.0);
    if let Err(err) = rt.set_property(this, "count", PropValue::Number(n + by)) {
        tracing::error!(%err, "count not updated");
        return;
    }
    if let Some(PropValue::Element(Some(output))) = rt.property(this, "output") {
        let text = format!("{}", n + by);
        if let Err(err) = rt.dom_mut().set_attribute(output, "data-text", &text) {
            tracing::error!(%err, "output not updated");
        }
    }
}

fn main() -> catalyst::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rt = Runtime::default();
    let marks = rt.builtins();
    let class = rt.define_class(ClassDescriptor::new("CounterElement").with_default("count", 0))?;
    rt.mark(marks.attr, class, "count");
    rt.mark(marks.target, class, "output");
    rt.define_element("counter-element", class, || {
        Box::new(
            Methods::new()
                .method("increment", |rt, this, _| step(rt, this, 1.0))
                .method("decrement", |rt, this, _| step(rt, this, -1.0)),
        )
    })?;

    let doc = rt.document();
    let counter = rt.create_element("counter-element")?;
    let minus = rt.create_element("button")?;
    rt.dom_mut()
        .set_attribute(minus, "data-action", "click:counter-element#decrement")?;
    let output = rt.create_element("output")?;
    rt.dom_mut()
        .set_attribute(output, "data-target", "counter-element.output")?;
    let plus = rt.create_element("button")?;
    rt.dom_mut()
        .set_attribute(plus, "data-action", "click:counter-element#increment")?;
    for child in [minus, output, plus] {
        rt.append_child(counter, child)?;
    }
    rt.append_child(doc, counter)?;

    for (button, label) in [(plus, "+"), (plus, "+"), (minus, "-"), (plus, "+")] {
        rt.dispatch_event(button, Event::new("click"))?;
        println!(
            "{label}  data-count={:?}  output={:?}",
            rt.dom().get_attribute(counter, "data-count"),
            rt.dom().get_attribute(output, "data-text"),
        );
    }
    Ok(())
}
