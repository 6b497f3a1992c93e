//! Shared fixtures for integration tests: a small order application whose
//! components are wired through proxies.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use logtrace::advice::{Advice, Proceed, Returned};
use logtrace::trace::{Clock, MemorySink, TraceContext, TraceId, Tracer};
use logtrace::{ErrorInfo, JoinPoint, MethodSignature, Proxy, ProxyFactory, Registration};

pub const FIXED_ID: &str = "abcd1234";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("{0}")]
    IllegalState(String),
}

impl ErrorInfo for OrderError {
    fn kind(&self) -> &str {
        "IllegalStateException"
    }
}

pub trait OrderRepository: Send + Sync {
    fn save(&self, item_id: &str) -> Result<String, OrderError>;
}

pub trait OrderService: Send + Sync {
    fn order_item(&self, item_id: &str) -> Result<(), OrderError>;
}

pub struct OrderRepositoryImpl;

impl OrderRepository for OrderRepositoryImpl {
    fn save(&self, item_id: &str) -> Result<String, OrderError> {
        if item_id == "ex" {
            return Err(OrderError::IllegalState("example exception".into()));
        }
        Ok("ok".into())
    }
}

pub struct OrderServiceImpl {
    pub repository: Arc<dyn OrderRepository>,
}

impl OrderService for OrderServiceImpl {
    fn order_item(&self, item_id: &str) -> Result<(), OrderError> {
        self.repository.save(item_id).map(|_| ())
    }
}

pub struct OrderController {
    pub service: Arc<dyn OrderService>,
}

impl OrderController {
    pub fn request(&self, item_id: &str) -> Result<String, OrderError> {
        self.service.order_item(item_id)?;
        Ok("ok".into())
    }

    pub fn no_log(&self) -> Result<String, OrderError> {
        Ok("ok".into())
    }
}

impl OrderRepository for Proxy<Arc<dyn OrderRepository>, OrderError> {
    fn save(&self, item_id: &str) -> Result<String, OrderError> {
        self.invoke("save", |r| r.save(item_id))
    }
}

impl OrderRepository for Proxy<OrderRepositoryImpl, OrderError> {
    fn save(&self, item_id: &str) -> Result<String, OrderError> {
        self.invoke("save", |r| r.save(item_id))
    }
}

impl OrderService for Proxy<Arc<dyn OrderService>, OrderError> {
    fn order_item(&self, item_id: &str) -> Result<(), OrderError> {
        self.invoke("orderItem", |s| s.order_item(item_id))
    }
}

impl OrderService for Proxy<OrderServiceImpl, OrderError> {
    fn order_item(&self, item_id: &str) -> Result<(), OrderError> {
        self.invoke("orderItem", |s| s.order_item(item_id))
    }
}

/// How the inner components are held by their proxies.
#[derive(Debug, Clone, Copy)]
pub enum View {
    /// `Proxy<Arc<dyn Trait>, _>`
    Interface,
    /// `Proxy<ConcreteType, _>`
    Concrete,
}

pub fn repository_registration() -> Registration {
    Registration::for_type("hello.aop.order.OrderRepository")
        .method(MethodSignature::new("save").param("String").returns("String"))
}

pub fn service_registration() -> Registration {
    Registration::for_type("hello.aop.order.OrderService").method(MethodSignature::new("orderItem").param("String"))
}

pub fn controller_registration() -> Registration {
    Registration::for_type("hello.aop.order.OrderController")
        .method(MethodSignature::new("request").param("String").returns("String"))
}

pub fn build_app(factory: &ProxyFactory<OrderError>, view: View) -> Proxy<OrderController, OrderError> {
    let service: Arc<dyn OrderService> = match view {
        View::Interface => {
            let repository: Arc<dyn OrderRepository> = Arc::new(factory.proxy(
                Arc::new(OrderRepositoryImpl) as Arc<dyn OrderRepository>,
                repository_registration(),
            ));
            Arc::new(factory.proxy(
                Arc::new(OrderServiceImpl { repository }) as Arc<dyn OrderService>,
                service_registration(),
            ))
        }
        View::Concrete => {
            let repository: Arc<dyn OrderRepository> =
                Arc::new(factory.proxy(OrderRepositoryImpl, repository_registration()));
            Arc::new(factory.proxy(OrderServiceImpl { repository }, service_registration()))
        }
    };
    factory.proxy(OrderController { service }, controller_registration())
}

pub fn request(controller: &Proxy<OrderController, OrderError>, item_id: &str) -> Result<String, OrderError> {
    controller.invoke("request", |c| c.request(item_id))
}

/// Tracer with a frozen clock and a constant root id, so output is exact.
pub fn fixed_tracer() -> (Tracer, MemorySink) {
    TraceContext::clear();
    let sink = MemorySink::new();
    let tracer = Tracer::new(sink.clone())
        .with_clock(Clock::frozen())
        .with_id_source(|| TraceId::from_parts(FIXED_ID, 0));
    (tracer, sink)
}

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Records entry, exit and the trace level visible on the way out.
pub struct Recorder {
    pub label: &'static str,
    pub log: Log,
}

impl Advice<OrderError> for Recorder {
    fn around<'a>(&self, jp: &JoinPoint<'a>, proceed: Proceed<'a, OrderError>) -> Result<Returned<'a>, OrderError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("[{}] enter {}", self.label, jp.short_signature()));
        let outcome = proceed.proceed();
        let level = TraceContext::current().map(|id| id.level());
        let status = if outcome.is_ok() { "ok" } else { "failed" };
        self.log
            .lock()
            .unwrap()
            .push(format!("[{}] {} {} level={:?}", self.label, status, jp.short_signature(), level));
        outcome
    }
}

pub const SUCCESS_LINES: [&str; 6] = [
    "[abcd1234] OrderController.request()",
    "[abcd1234] |-->OrderService.orderItem()",
    "[abcd1234] |   |-->OrderRepository.save()",
    "[abcd1234] |   |<--OrderRepository.save() time=0ms",
    "[abcd1234] |<--OrderService.orderItem() time=0ms",
    "[abcd1234] OrderController.request() time=0ms",
];

pub const FAILURE_LINES: [&str; 6] = [
    "[abcd1234] OrderController.request()",
    "[abcd1234] |-->OrderService.orderItem()",
    "[abcd1234] |   |-->OrderRepository.save()",
    "[abcd1234] |   |<X-OrderRepository.save() time=0ms ex=IllegalStateException: example exception",
    "[abcd1234] |<X-OrderService.orderItem() time=0ms ex=IllegalStateException: example exception",
    "[abcd1234] OrderController.request() time=0ms ex=IllegalStateException: example exception",
];
