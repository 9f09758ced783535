//! A scripted [`PrintHost`] that records what the pipeline does to it.

#![allow(dead_code)]

use printframe::{ImageRequest, PrintHost, StylesheetError};
use printframe_dom::{DomTree, NodeId};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "https://app.example.com/orders/";

/// When an event future resolves.
#[derive(Debug, Clone, Copy, Default)]
pub enum Signal {
    #[default]
    Immediate,
    After(Duration),
    Never,
}

impl Signal {
    async fn wait(self) {
        match self {
            Self::Immediate => {}
            Self::After(delay) => tokio::time::sleep(delay).await,
            Self::Never => std::future::pending::<()>().await,
        }
    }
}

/// What one image load attempt does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageBehavior {
    #[default]
    Load,
    Fail,
    Hang,
}

/// Per-test behavior of the host.
#[derive(Debug, Default)]
pub struct Script {
    pub deny_frames: bool,
    pub frame_load: Signal,
    pub after_print: Signal,
    /// Consumed one per attempt; `image_default` once empty.
    pub images: VecDeque<ImageBehavior>,
    pub image_default: ImageBehavior,
    pub stylesheets: HashMap<String, Result<String, StylesheetError>>,
    pub print_fails: bool,
}

#[derive(Debug, Clone)]
pub struct PrintedSurface {
    pub frame: NodeId,
    pub title: Option<String>,
    pub html: String,
}

#[derive(Debug, Default)]
pub struct Log {
    pub frames_created: Vec<NodeId>,
    pub frames_closed: Vec<NodeId>,
    pub prints: Vec<PrintedSurface>,
    pub image_requests: Vec<ImageRequest>,
    pub stylesheet_reads: Vec<String>,
}

pub struct MockHost {
    pub document: Rc<RefCell<DomTree>>,
    frames: RefCell<HashMap<NodeId, Rc<RefCell<DomTree>>>>,
    pub script: RefCell<Script>,
    pub log: RefCell<Log>,
    pub after_print_hits: Cell<usize>,
}

impl MockHost {
    pub fn new(document: DomTree) -> Rc<Self> {
        Rc::new(Self {
            document: Rc::new(RefCell::new(document)),
            frames: RefCell::new(HashMap::new()),
            script: RefCell::new(Script::default()),
            log: RefCell::new(Log::default()),
            after_print_hits: Cell::new(0),
        })
    }

    pub fn script(&self, edit: impl FnOnce(&mut Script)) {
        edit(&mut self.script.borrow_mut());
    }

    pub fn frames_created(&self) -> usize {
        self.log.borrow().frames_created.len()
    }

    pub fn frames_closed(&self) -> usize {
        self.log.borrow().frames_closed.len()
    }

    /// `<iframe>` elements currently attached to the live document.
    pub fn attached_frames(&self) -> usize {
        let doc = self.document.borrow();
        doc.elements_by_tag_name(NodeId::ROOT, "iframe").len()
    }

    pub fn prints(&self) -> Vec<PrintedSurface> {
        self.log.borrow().prints.clone()
    }

    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.log.borrow().image_requests.clone()
    }
}

impl PrintHost for MockHost {
    fn document(&self) -> Rc<RefCell<DomTree>> {
        Rc::clone(&self.document)
    }

    fn base_url(&self) -> Option<String> {
        Some(BASE_URL.to_string())
    }

    fn open_frame(&self, frame: NodeId) -> Option<Rc<RefCell<DomTree>>> {
        self.log.borrow_mut().frames_created.push(frame);
        if self.script.borrow().deny_frames {
            return None;
        }
        let content = Rc::new(RefCell::new(DomTree::new()));
        let _ = self.frames.borrow_mut().insert(frame, Rc::clone(&content));
        Some(content)
    }

    fn close_frame(&self, frame: NodeId) {
        let _ = self.frames.borrow_mut().remove(&frame);
        self.log.borrow_mut().frames_closed.push(frame);
    }

    async fn stylesheet_text(&self, href: &str) -> Result<String, StylesheetError> {
        self.log.borrow_mut().stylesheet_reads.push(href.to_string());
        self.script
            .borrow()
            .stylesheets
            .get(href)
            .cloned()
            .unwrap_or_else(|| Err(StylesheetError::Unavailable(format!("404 for {href}"))))
    }

    async fn frame_loaded(&self, _frame: NodeId) {
        let signal = self.script.borrow().frame_load;
        signal.wait().await;
    }

    async fn load_image(&self, request: &ImageRequest) -> anyhow::Result<()> {
        self.log.borrow_mut().image_requests.push(request.clone());
        let behavior = {
            let mut script = self.script.borrow_mut();
            let fallback = script.image_default;
            script.images.pop_front().unwrap_or(fallback)
        };
        match behavior {
            ImageBehavior::Load => Ok(()),
            ImageBehavior::Fail => anyhow::bail!("error event for {}", request.url),
            ImageBehavior::Hang => std::future::pending().await,
        }
    }

    fn print(&self, frame: NodeId, document: &DomTree) -> anyhow::Result<()> {
        if self.script.borrow().print_fails {
            anyhow::bail!("print dialog blocked");
        }
        self.log.borrow_mut().prints.push(PrintedSurface {
            frame,
            title: document.title(),
            html: document.to_html(NodeId::ROOT),
        });
        Ok(())
    }

    async fn after_print(&self, _frame: NodeId) {
        let signal = self.script.borrow().after_print;
        signal.wait().await;
        self.after_print_hits.set(self.after_print_hits.get() + 1);
    }
}

/// A live document titled "Orders" with one inline style block and an
/// attached `<section class="card">`. Returns the document and the card.
pub fn live_document() -> (DomTree, NodeId) {
    let mut doc = DomTree::new_html_document(Some("Orders"));
    let head = doc.head().unwrap();
    let body = doc.body().unwrap();

    let style = doc.create_element("style");
    doc.set_text_content(style, ".card { border: 1px solid #ccc; }");
    doc.append_child(head, style);

    let card = doc.create_element("section");
    let _ = doc.set_attribute(card, "class", "card");
    let heading = doc.create_element("h1");
    doc.set_text_content(heading, "Invoice #42");
    doc.append_child(card, heading);
    let total = doc.create_element("p");
    doc.set_text_content(total, "Total: 19.99");
    doc.append_child(card, total);
    doc.append_child(body, card);

    (doc, card)
}

/// Counts hook invocations.
#[derive(Debug, Clone, Default)]
pub struct Counter(Rc<Cell<usize>>);

impl Counter {
    pub fn hit(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

/// Formatted log output of a thread-scoped subscriber.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's events here until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn count(&self, needle: &str) -> usize {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .matches(needle)
            .count()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl tracing_subscriber::fmt::MakeWriter<'_> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&self) -> Self::Writer {
        self.clone()
    }
}
