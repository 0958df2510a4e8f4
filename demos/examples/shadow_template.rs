// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Template promotion and late markup.
//!
//! A controller carries a `<template data-shadowroot>`; on connect its content is
//! cloned into a shadow root, and the buttons inside dispatch to the host. Markup
//! inserted afterwards is bound at the next flush.
//!
//! Run:
//! - `cargo run -p catalyst_demos --example shadow_template`

use catalyst::{ClassDescriptor, Event, Methods, Runtime};
use tracing_subscriber::EnvFilter;

fn main() -> catalyst::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rt = Runtime::default();
    let marks = rt.builtins();
    let class = rt.define_class(ClassDescriptor::new("TodoList"))?;
    rt.mark(marks.targets, class, "items");
    rt.define_element("todo-list", class, || {
        Box::new(Methods::new().method("add", |rt, this, event| {
            let items = rt.property(this, "items");
            println!("add from {:?}; items = {items:?}", event.target());
        }))
    })?;

    let doc = rt.document();
    let list = rt.create_element("todo-list")?;
    let template = rt.create_element("template")?;
    rt.dom_mut().set_attribute(template, "data-shadowroot", "open")?;
    if let Some(content) = rt.dom().template_content(template) {
        let button = rt.create_element("button")?;
        rt.dom_mut()
            .set_attribute(button, "data-action", "click:todo-list#add")?;
        rt.dom_mut().append_child(content, button)?;
    }
    rt.append_child(list, template)?;
    rt.append_child(doc, list)?;

    let Some(shadow) = rt.dom().shadow_root(list) else {
        println!("no shadow root attached");
        return Ok(());
    };
    let Some(button) = rt.dom().children(shadow).first().copied() else {
        println!("template was empty");
        return Ok(());
    };
    rt.dispatch_event(button, Event::new("click"))?;

    // Late markup: a new item and a second button, inserted without any manual wiring.
    let item = rt.create_element("li")?;
    rt.dom_mut().set_attribute(item, "data-targets", "todo-list.items")?;
    rt.append_child(list, item)?;
    let again = rt.create_element("button")?;
    rt.dom_mut()
        .set_attribute(again, "data-action", "click:todo-list#add")?;
    rt.dom_mut().append_child(shadow, again)?;
    println!("delivered {} mutation records", rt.flush());
    rt.dispatch_event(again, Event::new("click"))?;
    Ok(())
}
