//! Page wiring for scroll reveals, the card light effect and the contact
//! form. Installed once from the start function; every listener lives as
//! long as the page.

use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    CssStyleDeclaration, Document, Element, Event, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, NodeList, Window,
};

use crate::config::*;
use crate::error::Result;
use crate::reveal::{keep_focus_on_blur, light_offset, section_items, Delay, Observer, Reveal};

pub fn install(window: &Window, document: &Document) -> Result<()> {
    track_light(document)?;
    observe(window, document, TIMELINE_ITEM_SELECTOR, Observer::Timeline)?;

    if document.ready_state() == "loading" {
        let window = window.clone();
        let doc = document.clone();
        let on_ready = Closure::once(move || {
            if let Err(e) = install_deferred(&window, &doc) {
                log::error!("reveal setup failed: {e}");
            }
        });
        document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
        on_ready.forget();
        Ok(())
    } else {
        install_deferred(window, document)
    }
}

fn install_deferred(window: &Window, document: &Document) -> Result<()> {
    observe(window, document, SECTION_SELECTOR, Observer::Section)?;
    for card in elements(document.query_selector_all(REVEAL_ITEM_SOURCES)?) {
        card.class_list().add_1(REVEAL_ITEM_CLASS)?;
    }
    observe(window, document, SKILL_ITEM_SELECTOR, Observer::Skill)?;
    form_affordances(document)?;
    log::debug!("reveal controller installed");
    Ok(())
}

fn elements(list: NodeList) -> impl Iterator<Item = Element> {
    (0..list.length())
        .filter_map(move |i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
}

/// Ordinal of `target` among all timeline items.
fn timeline_position(document: &Document, target: &Element) -> usize {
    document
        .query_selector_all(TIMELINE_ITEM_SELECTOR)
        .map(|list| {
            elements(list)
                .position(|el| el.is_same_node(Some(target.as_ref())))
                .unwrap_or(0)
        })
        .unwrap_or(0)
}

/// Ordinal of `target` among its parent's element children.
fn sibling_position(target: &Element) -> usize {
    let mut position = 0;
    let mut cursor = target.previous_element_sibling();
    while let Some(el) = cursor {
        position += 1;
        cursor = el.previous_element_sibling();
    }
    position
}

fn add_class(target: &Element, class: &str) {
    if let Err(e) = target.class_list().add_1(class) {
        log::warn!("could not add class `{class}`: {e:?}");
    }
}

fn remove_class(target: &Element, class: &str) {
    if let Err(e) = target.class_list().remove_1(class) {
        log::warn!("could not remove class `{class}`: {e:?}");
    }
}

fn set_style(style: &CssStyleDeclaration, property: &str, value: &str) {
    if let Err(e) = style.set_property(property, value) {
        log::warn!("could not set `{property}`: {e:?}");
    }
}

fn apply(window: &Window, target: &Element, reveal: Reveal) {
    let class = reveal.class;
    match reveal.delay {
        Delay::Immediate => add_class(target, class),
        Delay::Transition(ms) => {
            add_class(target, class);
            if let Some(el) = target.dyn_ref::<HtmlElement>() {
                set_style(&el.style(), "transition-delay", &format!("{ms}ms"));
            }
        }
        Delay::Timer(ms) => {
            let target = target.clone();
            let add = Closure::once_into_js(move || add_class(&target, class));
            if let Err(e) = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(add.unchecked_ref(), ms)
            {
                log::warn!("could not schedule reveal: {e:?}");
            }
        }
    }
}

/// Reveal `target`, which just became visible to observer `kind`. Returns
/// whether the observer should stop watching it.
fn reveal_target(window: &Window, document: &Document, kind: Observer, target: &Element) -> bool {
    let position = match kind {
        Observer::Timeline => timeline_position(document, target),
        Observer::Skill => sibling_position(target),
        Observer::Section => 0,
    };
    let Some(reveal) = kind.on_entry(true, position) else {
        return false;
    };
    apply(window, target, reveal);
    if kind == Observer::Section {
        match target.query_selector_all(REVEAL_ITEM_SELECTOR) {
            Ok(items) => {
                let items: Vec<_> = elements(items).collect();
                for (item, reveal) in items.iter().zip(section_items(items.len())) {
                    apply(window, item, reveal);
                }
            }
            Err(e) => log::warn!("could not query reveal items: {e:?}"),
        }
    }
    reveal.unobserve
}

fn observe(window: &Window, document: &Document, selector: &str, kind: Observer) -> Result<()> {
    let doc = document.clone();
    let win = window.clone();
    let callback = Closure::wrap(Box::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if reveal_target(&win, &doc, kind, &target) {
                    observer.unobserve(&target);
                }
            }
        },
    ) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
    options.set_root_margin(REVEAL_ROOT_MARGIN);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for el in elements(document.query_selector_all(selector)?) {
        observer.observe(&el);
    }
    Ok(())
}

fn track_light(document: &Document) -> Result<()> {
    for card in elements(document.query_selector_all(CARD_SELECTOR)?) {
        let Some(light) = card
            .query_selector(LIGHT_EFFECT_SELECTOR)?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        let target = card.clone();
        let on_move = Closure::wrap(Box::new(move |e: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            let (x, y) = light_offset(
                (e.client_x() as f64, e.client_y() as f64),
                (rect.left(), rect.top()),
            );
            let style = light.style();
            set_style(&style, LIGHT_X_PROPERTY, &x);
            set_style(&style, LIGHT_Y_PROPERTY, &y);
        }) as Box<dyn FnMut(MouseEvent)>);
        card.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        on_move.forget();
    }
    Ok(())
}

fn field_value(field: &Element) -> String {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

fn form_affordances(document: &Document) -> Result<()> {
    for field in elements(document.query_selector_all(FORM_FIELD_SELECTOR)?) {
        let target = field.clone();
        let on_focus = Closure::wrap(Box::new(move |_: Event| {
            if let Some(parent) = target.parent_element() {
                add_class(&parent, FOCUSED_CLASS);
            }
        }) as Box<dyn FnMut(Event)>);
        let target = field.clone();
        let on_blur = Closure::wrap(Box::new(move |_: Event| {
            if keep_focus_on_blur(&field_value(&target)) {
                return;
            }
            if let Some(parent) = target.parent_element() {
                remove_class(&parent, FOCUSED_CLASS);
            }
        }) as Box<dyn FnMut(Event)>);
        field.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref())?;
        field.add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref())?;
        on_focus.forget();
        on_blur.forget();
    }

    if let Some(form) = document.query_selector(CONTACT_FORM_SELECTOR)? {
        let target = form.clone();
        let on_submit = Closure::wrap(Box::new(move |_: Event| {
            match target.query_selector(SUBMIT_BUTTON_SELECTOR) {
                Ok(Some(button)) => {
                    add_class(&button, SENDING_CLASS);
                    button.set_inner_html(SENDING_LABEL);
                }
                Ok(None) => {}
                Err(e) => log::warn!("could not find submit button: {e:?}"),
            }
        }) as Box<dyn FnMut(Event)>);
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
        on_submit.forget();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn page() -> (Window, Document) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        (window, document)
    }

    fn fixture(document: &Document, html: &str) -> HtmlElement {
        let root: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
        root.set_inner_html(html);
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    fn all(root: &Element, selector: &str) -> Vec<Element> {
        elements(root.query_selector_all(selector).unwrap()).collect()
    }

    fn has_class(el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    #[wasm_bindgen_test]
    fn sibling_position_skips_text_nodes() {
        let (_, document) = page();
        let root = fixture(&document, "<ul><li>a</li> text <li>b</li><li>c</li></ul>");
        let positions: Vec<_> = all(&root, "li").iter().map(sibling_position).collect();
        assert_eq!(positions, [0, 1, 2]);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn timeline_position_spans_parents() {
        let (_, document) = page();
        let root = fixture(
            &document,
            r#"<div><div class="timeline-item"></div><div class="timeline-item"></div></div>
               <div><div class="timeline-item"></div></div>
               <p class="stray"></p>"#,
        );
        let items = all(&root, TIMELINE_ITEM_SELECTOR);
        let positions: Vec<_> = items
            .iter()
            .map(|el| timeline_position(&document, el))
            .collect();
        assert_eq!(positions, [0, 1, 2]);
        assert_eq!(sibling_position(&items[2]), 0);
        let stray = root.query_selector(".stray").unwrap().unwrap();
        assert_eq!(timeline_position(&document, &stray), 0);
        root.remove();
    }

    #[wasm_bindgen_test]
    fn timeline_reveal_sets_transition_delay_and_unobserves() {
        let (window, document) = page();
        let root = fixture(
            &document,
            r#"<div class="timeline-item"></div><div class="timeline-item"></div>"#,
        );
        let second = all(&root, TIMELINE_ITEM_SELECTOR).remove(1);
        assert!(reveal_target(&window, &document, Observer::Timeline, &second));
        assert!(has_class(&second, VISIBLE_CLASS));
        let delay = second
            .dyn_ref::<HtmlElement>()
            .unwrap()
            .style()
            .get_property_value("transition-delay")
            .unwrap();
        assert_eq!(delay, "100ms");
        root.remove();
    }

    #[wasm_bindgen_test]
    fn sections_unobserve_while_skills_retrigger() {
        let (window, document) = page();
        let root = fixture(
            &document,
            r#"<section class="form-container"><div class="reveal-item"></div></section>
               <ul><li class="skills-item"></li><li class="skills-item"></li></ul>"#,
        );
        let section = root.query_selector("section").unwrap().unwrap();
        assert!(reveal_target(&window, &document, Observer::Section, &section));
        assert!(has_class(&section, SECTION_VISIBLE_CLASS));

        let skill = all(&root, SKILL_ITEM_SELECTOR).remove(1);
        assert!(!reveal_target(&window, &document, Observer::Skill, &skill));
        assert!(!reveal_target(&window, &document, Observer::Skill, &skill));
        root.remove();
    }

    #[wasm_bindgen_test]
    fn blur_keeps_focused_while_field_has_text() {
        let (_, document) = page();
        let root = fixture(&document, r#"<div class="form-group"><input type="text"></div>"#);
        form_affordances(&document).unwrap();
        let group = root.query_selector(".form-group").unwrap().unwrap();
        let input: HtmlInputElement = root
            .query_selector("input")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap();

        input.dispatch_event(&Event::new("focus").unwrap()).unwrap();
        assert!(has_class(&group, FOCUSED_CLASS));

        input.set_value("hello");
        input.dispatch_event(&Event::new("blur").unwrap()).unwrap();
        assert!(has_class(&group, FOCUSED_CLASS));

        input.set_value("");
        input.dispatch_event(&Event::new("blur").unwrap()).unwrap();
        assert!(!has_class(&group, FOCUSED_CLASS));
        root.remove();
    }

    #[wasm_bindgen_test]
    fn submit_marks_button_as_sending() {
        let (_, document) = page();
        let root = fixture(
            &document,
            r#"<form class="contact-form"><button class="submit-btn">Send</button></form>"#,
        );
        form_affordances(&document).unwrap();
        let form = root.query_selector(CONTACT_FORM_SELECTOR).unwrap().unwrap();
        form.dispatch_event(&Event::new("submit").unwrap()).unwrap();

        let button = root.query_selector(SUBMIT_BUTTON_SELECTOR).unwrap().unwrap();
        assert!(has_class(&button, SENDING_CLASS));
        assert_eq!(button.inner_html(), SENDING_LABEL);
        root.remove();
    }
}
