//! The async submit contract between composers and whatever persists the data.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use crate::forms::FormValues;
use crate::services::errors::SubmitError;

/// `Ok` means the data was accepted. Nothing else is read from the result.
#[async_trait(?Send)]
pub trait SubmitHandler {
    async fn submit(&self, values: FormValues) -> Result<(), SubmitError>;
}

/// Adapts an async closure into a [`SubmitHandler`].
pub struct SubmitFn<F>(pub F);

#[async_trait(?Send)]
impl<F, Fut> SubmitHandler for SubmitFn<F>
where
    F: Fn(FormValues) -> Fut,
    Fut: Future<Output = Result<(), SubmitError>> + 'static,
{
    async fn submit(&self, values: FormValues) -> Result<(), SubmitError> {
        (self.0)(values).await
    }
}

/// Cloneable submit handler for component props.
#[derive(Clone)]
pub struct OnSubmit(Rc<dyn SubmitHandler>);

impl OnSubmit {
    pub fn new(handler: impl SubmitHandler + 'static) -> Self {
        Self(Rc::new(handler))
    }

    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(FormValues) -> Fut + 'static,
        Fut: Future<Output = Result<(), SubmitError>> + 'static,
    {
        Self::new(SubmitFn(f))
    }
}

#[async_trait(?Send)]
impl SubmitHandler for OnSubmit {
    async fn submit(&self, values: FormValues) -> Result<(), SubmitError> {
        self.0.submit(values).await
    }
}

impl PartialEq for OnSubmit {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for OnSubmit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnSubmit(..)")
    }
}
