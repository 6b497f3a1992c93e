//! Sample order flow: controller → service → repository, each behind a proxy.

use std::sync::Arc;

use logtrace::{ErrorInfo, MethodSignature, Proxy, ProxyFactory, Registration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    IllegalState(String),
}

impl ErrorInfo for OrderError {
    fn kind(&self) -> &str {
        match self {
            OrderError::IllegalState(_) => "IllegalStateException",
        }
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
            return Err(OrderError::IllegalState("example exception".to_string()));
        }
        Ok("ok".to_string())
    }
}

pub struct OrderServiceImpl {
    repository: Arc<dyn OrderRepository>,
}

impl OrderService for OrderServiceImpl {
    fn order_item(&self, item_id: &str) -> Result<(), OrderError> {
        self.repository.save(item_id).map(|_| ())
    }
}

pub struct OrderController {
    service: Arc<dyn OrderService>,
}

impl OrderController {
    pub fn request(&self, item_id: &str) -> Result<String, OrderError> {
        self.service.order_item(item_id)?;
        Ok("ok".to_string())
    }

    pub fn no_log(&self) -> Result<String, OrderError> {
        Ok("ok".to_string())
    }
}

impl OrderRepository for Proxy<Arc<dyn OrderRepository>, OrderError> {
    fn save(&self, item_id: &str) -> Result<String, OrderError> {
        self.invoke("save", |repository| repository.save(item_id))
    }
}

impl OrderService for Proxy<Arc<dyn OrderService>, OrderError> {
    fn order_item(&self, item_id: &str) -> Result<(), OrderError> {
        self.invoke("orderItem", |service| service.order_item(item_id))
    }
}

/// Build the proxied object graph and return the controller proxy.
pub fn build(factory: &ProxyFactory<OrderError>) -> Proxy<OrderController, OrderError> {
    let repository: Arc<dyn OrderRepository> = Arc::new(factory.proxy(
        Arc::new(OrderRepositoryImpl) as Arc<dyn OrderRepository>,
        Registration::for_type("hello.aop.order.OrderRepository")
            .method(MethodSignature::new("save").param("String").returns("String")),
    ));
    let service: Arc<dyn OrderService> = Arc::new(factory.proxy(
        Arc::new(OrderServiceImpl { repository }) as Arc<dyn OrderService>,
        Registration::for_type("hello.aop.order.OrderService")
            .method(MethodSignature::new("orderItem").param("String")),
    ));
    factory.proxy(
        OrderController { service },
        Registration::for_type("hello.aop.order.OrderController")
            .method(MethodSignature::new("request").param("String").returns("String")),
    )
}

pub fn request(controller: &Proxy<OrderController, OrderError>, item_id: &str) -> Result<String, OrderError> {
    controller.invoke("request", |c| c.request(item_id))
}

/// `noLog` is not registered, so it bypasses every advisor.
pub fn no_log(controller: &Proxy<OrderController, OrderError>) -> Result<String, OrderError> {
    controller.invoke("noLog", OrderController::no_log)
}
