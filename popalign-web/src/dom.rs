//! [`LayoutHost`] on the real DOM

use popalign_core::common::{Rect, Size};
use popalign_core::{
    parse_px, ComputedBox, DocumentMetrics, Edges, ElementKind, LayoutHost, OverflowStyle,
    PopupMeasurement,
};
use wasm_bindgen_x::JsCast;
use web_sys_x::{CssStyleDeclaration, Element, HtmlElement, ShadowRoot};

/// Inline styles touched while measuring a popup
const MEASURE_PROPERTIES: [&str; 5] = ["left", "top", "right", "bottom", "overflow"];

/// Reads layout from the current window's document
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDom;

impl WebDom {
    fn computed_style(&self, element: &Element) -> Option<CssStyleDeclaration> {
        web_sys_x::window()?.get_computed_style(element).ok().flatten()
    }
}

fn property(style: &CssStyleDeclaration, name: &str) -> String {
    style.get_property_value(name).unwrap_or_default()
}

fn dom_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

fn set_styles(style: &CssStyleDeclaration, values: [&str; 5]) {
    for (name, value) in MEASURE_PROPERTIES.iter().zip(values) {
        style.set_property(name, value).ok();
    }
}

impl LayoutHost for WebDom {
    type Element = Element;

    fn parent_element(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn element_kind(&self, element: &Element) -> ElementKind {
        match element.tag_name().to_ascii_uppercase().as_str() {
            "HTML" => ElementKind::Html,
            "BODY" => ElementKind::Body,
            _ => ElementKind::Other,
        }
    }

    fn computed_box(&self, element: &Element) -> ComputedBox {
        let Some(style) = self.computed_style(element) else {
            return ComputedBox::default();
        };
        ComputedBox {
            overflow: OverflowStyle::from_css(&property(&style, "overflow")),
            overflow_x: OverflowStyle::from_css(&property(&style, "overflow-x")),
            overflow_y: OverflowStyle::from_css(&property(&style, "overflow-y")),
            overflow_clip_margin: parse_px(&property(&style, "overflow-clip-margin")),
            border: Edges {
                top: parse_px(&property(&style, "border-top-width")),
                right: parse_px(&property(&style, "border-right-width")),
                bottom: parse_px(&property(&style, "border-bottom-width")),
                left: parse_px(&property(&style, "border-left-width")),
            },
            width: parse_px(&property(&style, "width")),
            height: parse_px(&property(&style, "height")),
        }
    }

    fn bounding_rect(&self, element: &Element) -> Rect {
        dom_rect(element)
    }

    fn offset_size(&self, element: &Element) -> Size {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => Size::new(html.offset_width() as f64, html.offset_height() as f64),
            None => Size::default(),
        }
    }

    fn client_size(&self, element: &Element) -> Size {
        Size::new(element.client_width() as f64, element.client_height() as f64)
    }

    fn has_offset_parent(&self, element: &Element) -> bool {
        element
            .dyn_ref::<HtmlElement>()
            .is_some_and(|html| html.offset_parent().is_some())
    }

    fn bbox_size(&self, element: &Element) -> Option<Size> {
        // Only SVG graphics elements have getBBox
        let get_bbox = js_sys_x::Reflect::get(element, &"getBBox".into()).ok()?;
        let func = get_bbox.dyn_ref::<js_sys_x::Function>()?;
        let bbox = func.call0(element).ok()?;
        let width = js_sys_x::Reflect::get(&bbox, &"width".into()).ok()?.as_f64()?;
        let height = js_sys_x::Reflect::get(&bbox, &"height".into()).ok()?.as_f64()?;
        Some(Size::new(width, height))
    }

    fn shadow_host(&self, element: &Element) -> Option<Element> {
        element
            .get_root_node()
            .dyn_into::<ShadowRoot>()
            .ok()
            .map(|root| root.host())
    }

    fn document_metrics(&self) -> Option<DocumentMetrics> {
        let root = web_sys_x::window()?.document()?.document_element()?;
        Some(DocumentMetrics {
            client_width: root.client_width() as f64,
            client_height: root.client_height() as f64,
            scroll_width: root.scroll_width() as f64,
            scroll_height: root.scroll_height() as f64,
            scroll_top: root.scroll_top() as f64,
            scroll_left: root.scroll_left() as f64,
        })
    }

    fn measure_popup(&self, popup: &Element) -> PopupMeasurement {
        let style_size = self
            .computed_style(popup)
            .map(|style| {
                Size::new(
                    parse_px(&property(&style, "width")),
                    parse_px(&property(&style, "height")),
                )
            })
            .unwrap_or(Size::new(f64::NAN, f64::NAN));

        let Some(inline) = popup.dyn_ref::<HtmlElement>().map(|html| html.style()) else {
            let rect = dom_rect(popup);
            return PopupMeasurement {
                rect,
                mirror: rect,
                style_size,
            };
        };

        let saved = MEASURE_PROPERTIES.map(|name| property(&inline, name));

        set_styles(&inline, ["0", "0", "auto", "auto", "hidden"]);
        let rect = dom_rect(popup);
        set_styles(&inline, ["auto", "auto", "0", "0", "hidden"]);
        let mirror = dom_rect(popup);

        for (name, value) in MEASURE_PROPERTIES.iter().zip(saved.iter()) {
            if value.is_empty() {
                inline.remove_property(name).ok();
            } else {
                inline.set_property(name, value).ok();
            }
        }

        PopupMeasurement {
            rect,
            mirror,
            style_size,
        }
    }
}
