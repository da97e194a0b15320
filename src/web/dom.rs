use crate::scroll::{Markers, PinState};
use crate::viewer::{Overlay, ViewerError};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement};

const SECTION_ID: &str = "model-section";
const WRAPPER_ID: &str = "model-canvas-wrapper";

fn missing(selector: &str) -> ViewerError {
    ViewerError::MissingElement(selector.to_owned())
}

fn html(element: Element, selector: &str) -> Result<HtmlElement, ViewerError> {
    element.dyn_into::<HtmlElement>().map_err(|_| missing(selector))
}

/// The host page: the model section and the canvas created inside it.
pub struct Page {
    document: Document,
    section: HtmlElement,
    canvas: HtmlCanvasElement,
}

impl Page {
    /// Creates `div#model-canvas-wrapper` with a canvas under
    /// `#model-section`.
    pub fn attach() -> Result<Self, ViewerError> {
        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let document = window.document().ok_or_else(|| missing("document"))?;

        let selector = format!("#{SECTION_ID}");
        let section = document
            .get_element_by_id(SECTION_ID)
            .ok_or_else(|| missing(&selector))?;
        let section = html(section, &selector)?;

        let wrapper = document.create_element("div")?;
        wrapper.set_id(WRAPPER_ID);
        section.append_child(&wrapper)?;

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| missing("canvas"))?;
        let style = canvas.style();
        style.set_property("display", "block")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100vh")?;
        wrapper.append_child(&canvas)?;

        if let Some(body) = document.body() {
            body.style().set_property("opacity", "1")?;
        }

        Ok(Self {
            document,
            section,
            canvas,
        })
    }

    pub fn canvas(&self) -> HtmlCanvasElement {
        self.canvas.clone()
    }

    pub fn viewport_size() -> (f64, f64) {
        let Some(window) = web_sys::window() else {
            return (1.0, 1.0);
        };
        let read = |value: Result<wasm_bindgen::JsValue, _>| value.ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        (read(window.inner_width()), read(window.inner_height()))
    }

    pub fn scroll_y() -> f64 {
        web_sys::window()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0)
    }

    /// Document offset of the section's top edge, where the scroll window
    /// starts.
    pub fn section_top(&self) -> f64 {
        self.section.get_bounding_client_rect().top() + Self::scroll_y()
    }
}

/// Web presenter for [`Overlay`], writing into the page's own elements.
pub struct DomOverlay {
    section: HtmlElement,
    section_height: f64,
    coords: Option<HtmlElement>,
    loading: Option<HtmlElement>,
    panels: Vec<HtmlElement>,
    spacer: Option<HtmlElement>,
    markers: Option<[HtmlElement; 2]>,
    pin: Option<PinState>,
}

impl DomOverlay {
    /// Looks up every element `initial` refers to; a missing one fails.
    pub fn new(page: &Page, initial: &Overlay) -> Result<Self, ViewerError> {
        let document = &page.document;

        let coords = match initial.coords {
            Some(_) => {
                let element = document.get_element_by_id("coords").ok_or_else(|| missing("#coords"))?;
                Some(html(element, "#coords")?)
            }
            None => None,
        };

        let loading = match initial.loading {
            Some(_) => Some(query(document, ".loading")?),
            None => None,
        };

        let panels = initial
            .panels
            .iter()
            .map(|panel| query(document, &format!(".{}", panel.class)))
            .collect::<Result<Vec<_>, _>>()?;

        let spacer = match initial.pin {
            Some(pin) => {
                let spacer = html(document.create_element("div")?, "div")?;
                spacer.set_class_name("pin-spacer");
                spacer.style().set_property("height", &px(pin.spacing))?;
                if let Some(parent) = page.section.parent_node() {
                    parent.insert_before(&spacer, page.section.next_sibling().as_ref())?;
                }
                Some(spacer)
            }
            None => None,
        };

        let markers = match initial.markers {
            Some(markers) => Some(create_markers(document, markers)?),
            None => None,
        };

        Ok(Self {
            section: page.section.clone(),
            section_height: f64::from(page.section.offset_height()),
            coords,
            loading,
            panels,
            spacer,
            markers,
            pin: None,
        })
    }

    pub fn present(&mut self, overlay: &Overlay) -> Result<(), ViewerError> {
        if let (Some(element), Some(text)) = (&self.coords, &overlay.coords) {
            element.set_text_content(Some(text));
        }

        if let Some(element) = &self.loading {
            match &overlay.loading {
                Some(text) => {
                    element.set_inner_text(text);
                    element.style().remove_property("display")?;
                }
                None => element.style().set_property("display", "none")?,
            }
        }

        for (element, panel) in self.panels.iter().zip(&overlay.panels) {
            let style = element.style();
            style.set_property("opacity", &panel.state.opacity.to_string())?;
            style.set_property("transform", &format!("translateX({}px)", panel.state.offset_x))?;
        }

        if let Some(pin) = overlay.pin {
            if self.pin != Some(pin.state) {
                self.apply_pin(pin.state, pin.spacing)?;
                self.pin = Some(pin.state);
            }
        }

        if let (Some([start, end]), Some(markers)) = (&self.markers, overlay.markers) {
            start.style().set_property("top", &px(markers.start))?;
            end.style().set_property("top", &px(markers.end))?;
        }

        Ok(())
    }

    fn apply_pin(&self, state: PinState, spacing: f64) -> Result<(), ViewerError> {
        let style = self.section.style();
        // A fixed section leaves the flow; the spacer takes its height too.
        let spacer_height = match state {
            PinState::Pinned => {
                style.set_property("position", "fixed")?;
                style.set_property("top", "0")?;
                style.set_property("left", "0")?;
                style.set_property("width", "100%")?;
                spacing + self.section_height
            }
            PinState::Before => {
                style.set_property("position", "relative")?;
                style.set_property("top", "0")?;
                spacing
            }
            PinState::After { offset } => {
                style.set_property("position", "relative")?;
                style.set_property("top", &px(offset))?;
                spacing
            }
        };
        if let Some(spacer) = &self.spacer {
            spacer.style().set_property("height", &px(spacer_height))?;
        }
        Ok(())
    }
}

fn query(document: &Document, selector: &str) -> Result<HtmlElement, ViewerError> {
    let element = document.query_selector(selector)?.ok_or_else(|| missing(selector))?;
    html(element, selector)
}

fn px(value: f64) -> String {
    format!("{value}px")
}

fn create_markers(document: &Document, markers: Markers) -> Result<[HtmlElement; 2], ViewerError> {
    let body = document.body().ok_or_else(|| missing("body"))?;
    let make = |label: &str, color: &str, top: f64| -> Result<HtmlElement, ViewerError> {
        let marker = html(document.create_element("div")?, "div")?;
        marker.set_class_name("scroll-marker");
        marker.set_inner_text(label);
        let style = marker.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", "0")?;
        style.set_property("right", "0")?;
        style.set_property("top", &px(top))?;
        style.set_property("border-top", &format!("1px solid {color}"))?;
        style.set_property("color", color)?;
        style.set_property("font", "12px monospace")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("z-index", "1000")?;
        body.append_child(&marker)?;
        Ok(marker)
    };
    Ok([make("start", "green", markers.start)?, make("end", "red", markers.end)?])
}
