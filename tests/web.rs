#![cfg(target_arch = "wasm32")]

use gradient_wasm::Gradients;
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn container(class: &str) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let el: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    el.set_class_name(class);
    el.style().set_property("width", "320px").unwrap();
    el.style().set_property("height", "200px").unwrap();
    el.set_inner_html("<p>placeholder</p>");
    document.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn mount_injects_one_canvas_per_container() {
    let a = container("web-test-a");
    let b = container("web-test-a");
    let mut gradients = Gradients::new().unwrap();
    assert_eq!(gradients.mount(Some(".web-test-a".into())).unwrap(), 2);
    assert_eq!(gradients.live_count(), 2);
    for el in [&a, &b] {
        assert_eq!(el.child_element_count(), 1);
        let canvas = el.first_element_child().unwrap();
        assert_eq!(canvas.tag_name().to_lowercase(), "canvas");
    }
    gradients.dispose();
    assert_eq!(gradients.live_count(), 0);
    assert_eq!(a.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn update_parameters_restarts_with_merged_values() {
    let el = container("web-test-b");
    let mut gradients = Gradients::new().unwrap();
    gradients.mount(Some(".web-test-b".into())).unwrap();

    let patch = Object::new();
    Reflect::set(&patch, &"speed".into(), &JsValue::from_f64(2.0)).unwrap();
    Reflect::set(&patch, &"bogus".into(), &JsValue::from_f64(1.0)).unwrap();
    assert_eq!(gradients.update_parameters(&patch).unwrap(), 1);
    assert_eq!(gradients.live_count(), 1);
    assert_eq!(el.child_element_count(), 1);

    let params = gradients.parameters().unwrap();
    let speed = Reflect::get(&params, &"speed".into()).unwrap();
    let zoom = Reflect::get(&params, &"zoom".into()).unwrap();
    assert_eq!(speed.as_f64(), Some(2.0));
    assert_eq!(zoom.as_f64(), Some(2.0));
    gradients.dispose();
}

#[wasm_bindgen_test]
fn release_stops_a_single_gradient() {
    let a = container("web-test-c");
    let b = container("web-test-c");
    let mut gradients = Gradients::new().unwrap();
    assert_eq!(gradients.mount(Some(".web-test-c".into())).unwrap(), 2);

    assert!(gradients.release(0));
    assert!(!gradients.release(0));
    assert!(!gradients.release(7));
    assert_eq!(gradients.live_count(), 1);
    assert_eq!(a.child_element_count(), 0);
    assert_eq!(b.child_element_count(), 1);

    assert_eq!(gradients.dispose(), 1);
    assert_eq!(b.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn no_containers_is_not_an_error() {
    let mut gradients = Gradients::new().unwrap();
    assert_eq!(gradients.mount(Some(".does-not-exist".into())).unwrap(), 0);
    assert_eq!(gradients.update_parameters(&Object::new()).unwrap(), 0);
}
