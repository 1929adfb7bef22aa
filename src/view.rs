use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

use kaiwabako_core::{ClampContext, DialogState};

// Stacking bias keeps every dialog above typical host chrome.
pub(crate) const Z_STACK_BIAS: usize = 20000;

const ROOT_STYLE: &str = "z-index: 20000; border: 1px solid purple; margin: 0px; \
    padding: 1px; background-color: white; position: fixed; top: 0; left: 0;";

/// Handles into the rendered subtree; rebuilt wholesale on every render.
pub(crate) struct DialogParts {
    pub frame: Element,
    pub header: Element,
    pub title: Element,
    pub close: Element,
    pub body: Element,
    pub footer: Element,
    pub input: HtmlInputElement,
    pub send: Element,
}

/// Rebuilds the dialog subtree under `root` from the current state. The
/// previous subtree is dropped wholesale; the caller rebinds listeners on
/// the returned parts so a re-render never doubles a binding.
pub(crate) fn build(
    document: &Document,
    root: &HtmlElement,
    state: &DialogState,
) -> Result<DialogParts, JsValue> {
    root.set_text_content(None);
    let _ = root.set_attribute("style", ROOT_STYLE);

    let style = document.create_element("style")?;
    style.set_text_content(Some(&style_text(&root.id())));
    root.append_child(&style)?;

    let frame = document.create_element("div")?;
    frame.set_class_name("dialog");

    let header = document.create_element("div")?;
    header.set_class_name("header");
    let title = document.create_element("span")?;
    title.set_class_name("title");
    title.set_text_content(Some(&state.title));
    let close = document.create_element("div")?;
    close.set_class_name("close");
    close.set_text_content(Some("X"));
    header.append_child(&title)?;
    header.append_child(&close)?;

    let body = document.create_element("pre")?;
    body.set_class_name("body");
    body.set_text_content(Some(&state.body));

    let footer = document.create_element("div")?;
    footer.set_class_name("footer");
    let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    input.set_class_name("message");
    let _ = input.set_attribute("placeholder", "Enter message here");
    let _ = input.set_attribute("type", "text");
    let send = document.create_element("div")?;
    send.set_class_name("send");
    send.set_text_content(Some("Send"));
    footer.append_child(&input)?;
    footer.append_child(&send)?;

    frame.append_child(&header)?;
    frame.append_child(&body)?;
    frame.append_child(&footer)?;
    root.append_child(&frame)?;

    Ok(DialogParts {
        frame,
        header,
        title,
        close,
        body,
        footer,
        input,
        send,
    })
}

pub(crate) fn apply_position(root: &HtmlElement, x: i32, y: i32) {
    let _ = root
        .style()
        .set_property("transform", &format!("translate({x}px, {y}px)"));
}

pub(crate) fn apply_stacking(root: &HtmlElement, z: usize) {
    let _ = root
        .style()
        .set_property("z-index", &(Z_STACK_BIAS + z).to_string());
}

pub(crate) fn apply_visibility(root: &HtmlElement, hide: bool) {
    if hide {
        let _ = root.style().set_property("visibility", "hidden");
    } else {
        let _ = root.style().remove_property("visibility");
    }
}

/// Measures the viewport, the dialog box, and the host page offsets the way
/// the page reports them: computed styles, whole pixels.
pub(crate) fn measure_context(
    window: &Window,
    document: &Document,
    root: &HtmlElement,
) -> ClampContext {
    let (viewport_width, viewport_height) = document
        .document_element()
        .map(|doc| (doc.client_width(), doc.client_height()))
        .unwrap_or((0, 0));
    let (element_width, element_height) = computed_size(window, root);
    let (offset_x, offset_y) = page_offsets(window, document);
    ClampContext {
        viewport_width,
        viewport_height,
        element_width,
        element_height,
        offset_x,
        offset_y,
    }
}

fn computed_size(window: &Window, element: &HtmlElement) -> (i32, i32) {
    match window.get_computed_style(element) {
        Ok(Some(style)) => (
            px_to_int(&style.get_property_value("width").unwrap_or_default()),
            px_to_int(&style.get_property_value("height").unwrap_or_default()),
        ),
        _ => (0, 0),
    }
}

fn page_offsets(window: &Window, document: &Document) -> (i32, i32) {
    let Some(body) = document.body() else {
        return (0, 0);
    };
    match window.get_computed_style(&body) {
        Ok(Some(style)) => {
            let read = |name: &str| px_to_int(&style.get_property_value(name).unwrap_or_default());
            (
                read("padding-left") + read("margin-left"),
                read("padding-top") + read("margin-top"),
            )
        }
        _ => (0, 0),
    }
}

/// First run of digits in a computed px string; `"12.5px"` reads as 12 and
/// anything without digits as 0.
pub(crate) fn px_to_int(value: &str) -> i32 {
    let Some(start) = value.find(|ch: char| ch.is_ascii_digit()) else {
        return 0;
    };
    value[start..]
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn style_text(root_id: &str) -> String {
    format!(
        r#"
#{root_id} div {{
    margin: 0;
    padding: 0;
    border: 0;
    font-family: sans-serif;
    font-size: 1rem;
    font-weight: 400;
    line-height: 1;
}}
#{root_id} .header {{
    cursor: move;
    padding: 2px;
    background-color: #666666;
    color: white;
    height: 24px;
    line-height: 1.5;
    vertical-align: middle;
    text-align: center;
}}
#{root_id} .body {{
    margin: 0;
    padding: 2px;
    min-height: 200px;
    max-height: 200px;
    overflow: auto;
}}
#{root_id} .footer {{
    cursor: text;
    background-color: #BBBBBB;
    color: black;
    line-height: 1;
    height: 30px;
    width: 100%;
    display: flex;
    flex-flow: row nowrap;
    justify-content: space-between;
    align-items: center;
}}
#{root_id} .message {{
    margin: 0;
    padding: 0;
    padding-left: 5px;
    border: 1px solid #666666;
    background-color: #BBBBBB;
    height: 28px;
    width: 250px;
    font-size: .8rem;
    vertical-align: middle;
}}
#{root_id} .send {{
    cursor: pointer;
    padding-top: 7px;
    background-color: #CCCCCC;
    color: black;
    height: 23px;
    width: 50px;
    vertical-align: middle;
    text-align: center;
}}
#{root_id} .close {{
    cursor: pointer;
    position: absolute;
    top: 2px;
    right: 5px;
    background-color: #666666;
    color: #ff2222;
    width: 14px;
    height: 14px;
    padding-left: 2px;
    padding-top: 2px;
    line-height: 1.5;
    font-weight: bold;
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_to_int_reads_leading_digit_run() {
        assert_eq!(px_to_int("250px"), 250);
        assert_eq!(px_to_int("12.5px"), 12);
        assert_eq!(px_to_int("-8px"), 8);
        assert_eq!(px_to_int("auto"), 0);
        assert_eq!(px_to_int(""), 0);
    }

    #[test]
    fn style_text_is_scoped_to_the_root_id() {
        let css = style_text("kaiwabako-dialog-3");
        assert!(css.contains("#kaiwabako-dialog-3 .header"));
        assert!(css.contains("#kaiwabako-dialog-3 .close"));
    }
}
