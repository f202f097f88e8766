//! # Middleware
//!
//! `handle(request, response, next)` middleware chain for form processing. A
//! [`Form`] is itself a middleware: it processes the request, then continues
//! with the rest of the chain, or stops with the fault when a pipeline fails
//! to execute.

use crate::error::FormOutcome;
use crate::form::Form;
use crate::request::{FormRequest, FormResponse};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for boxed future in Next
pub type NextFuture<'a> =
    Pin<Box<dyn Future<Output = FormOutcome<(FormRequest, FormResponse)>> + Send + 'a>>;

type Handler = Box<dyn FnOnce(FormRequest, FormResponse) -> NextFuture<'static> + Send>;

/// Next represents the rest of the middleware chain
pub struct Next {
    handler: Handler,
}

impl Next {
    /// Create a new Next with a handler function
    pub fn new<F>(handler: F) -> Self
    where
        F: FnOnce(FormRequest, FormResponse) -> NextFuture<'static> + Send + 'static,
    {
        Self {
            handler: Box::new(handler),
        }
    }

    /// A continuation that hands the request and response straight back
    pub fn terminal() -> Self {
        Self::new(|request, response| {
            let outcome: FormOutcome<_> = Ok((request, response));
            Box::pin(async move { outcome })
        })
    }

    /// Run the rest of the middleware chain
    pub async fn run(
        self,
        request: FormRequest,
        response: FormResponse,
    ) -> FormOutcome<(FormRequest, FormResponse)> {
        (self.handler)(request, response).await
    }
}

/// Middleware with the handle(request, response, next) pattern.
/// Uses boxed futures to be dyn-compatible
pub trait Middleware: Send + Sync + std::fmt::Debug {
    /// Handle the request and call the next middleware in the chain
    fn handle(&self, request: FormRequest, response: FormResponse, next: Next) -> NextFuture<'static>;

    /// Optional middleware name for debugging
    fn name(&self) -> &'static str {
        "Middleware"
    }
}

impl Middleware for Form {
    fn handle(&self, mut request: FormRequest, mut response: FormResponse, next: Next) -> NextFuture<'static> {
        let form = self.clone();
        Box::pin(async move {
            form.run(&mut request, Some(&mut response)).await?;
            next.run(request, response).await
        })
    }

    fn name(&self) -> &'static str {
        "Form"
    }
}

/// Ordered chain of middleware
#[derive(Debug, Clone, Default)]
pub struct MiddlewarePipeline {
    middleware: Vec<Arc<dyn Middleware>>,
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
        }
    }

    /// Add middleware to the pipeline
    pub fn add<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Add middleware to the pipeline (mutable version)
    pub fn add_mut<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middleware.push(Arc::new(middleware));
    }

    /// Append another pipeline; its middleware runs after this one's
    pub fn extend(mut self, other: Self) -> Self {
        self.middleware.extend(other.middleware);
        self
    }

    /// Execute the middleware pipeline with a final handler
    pub async fn execute<F, Fut>(
        &self,
        request: FormRequest,
        response: FormResponse,
        handler: F,
    ) -> FormOutcome<(FormRequest, FormResponse)>
    where
        F: FnOnce(FormRequest, FormResponse) -> Fut + Send + 'static,
        Fut: Future<Output = FormOutcome<(FormRequest, FormResponse)>> + Send + 'static,
    {
        let mut chain = Box::new(move |req: FormRequest, res: FormResponse| {
            Box::pin(handler(req, res)) as NextFuture<'static>
        }) as Handler;

        for middleware in self.middleware.iter().rev() {
            let middleware = Arc::clone(middleware);
            let next_handler = chain;
            chain = Box::new(move |req: FormRequest, res: FormResponse| {
                let next = Next::new(next_handler);
                middleware.handle(req, res, next)
            });
        }

        chain(request, response).await
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Get middleware names for debugging
    pub fn names(&self) -> Vec<&'static str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }
}
