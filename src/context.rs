//! App-wide state: who the user is, which course they picked, and whether
//! that is still being worked out.

use crate::{
    balance::ServerFnBalance,
    bootstrap::{bootstrap, Bootstrap},
    course::Course,
    host,
    user::{TokenError, User},
};
use leptos::{prelude::*, task::spawn_local};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("use_global_context must be used within a GlobalProvider")]
    OutsideProvider,
}

/// A snapshot of the app state. Every change produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalState {
    pub user: Option<User>,
    pub course: Option<Course>,
    pub is_loading: bool,
    pub bootstrap_error: Option<String>,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            user: None,
            course: None,
            is_loading: true,
            bootstrap_error: None,
        }
    }
}

impl GlobalState {
    pub fn loaded(self, bootstrap: &Bootstrap) -> Self {
        Self {
            user: bootstrap.user.clone(),
            is_loading: false,
            bootstrap_error: bootstrap.outcome.error(),
            ..self
        }
    }

    pub fn with_user(self, user: Option<User>) -> Self {
        Self { user, ..self }
    }

    pub fn with_course(self, course: Option<Course>) -> Self {
        Self { course, ..self }
    }

    pub fn with_tokens_added(&self, quantity: u32) -> Result<Self, TokenError> {
        let user = self.user.as_ref().ok_or(TokenError::NoUser)?;
        Ok(Self {
            user: Some(user.with_tokens_added(quantity)?),
            ..self.clone()
        })
    }

    pub fn with_tokens_retracted(&self) -> Result<Self, TokenError> {
        let user = self.user.as_ref().ok_or(TokenError::NoUser)?;
        Ok(Self {
            user: Some(user.with_tokens_retracted()?),
            ..self.clone()
        })
    }

    pub fn balance(&self) -> Option<i64> {
        self.user.as_ref().map(|user| user.tokens_balance)
    }
}

/// Handle to the app state handed out by [`GlobalProvider`].
#[derive(Debug, Clone, Copy)]
pub struct GlobalContext {
    state: RwSignal<GlobalState>,
}

impl Default for GlobalContext {
    fn default() -> Self {
        Self::new(GlobalState::default())
    }
}

impl GlobalContext {
    pub fn new(state: GlobalState) -> Self {
        Self {
            state: RwSignal::new(state),
        }
    }

    pub fn state(&self) -> GlobalState {
        self.state.get()
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|state| state.user.clone())
    }

    pub fn set_user(&self, user: Option<User>) {
        self.state.update(|state| *state = state.clone().with_user(user));
    }

    pub fn course(&self) -> Option<Course> {
        self.state.with(|state| state.course.clone())
    }

    pub fn set_course(&self, course: Option<Course>) {
        self.state.update(|state| *state = state.clone().with_course(course));
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|state| state.is_loading)
    }

    pub fn bootstrap_error(&self) -> Option<String> {
        self.state.with(|state| state.bootstrap_error.clone())
    }

    pub fn finish_loading(&self, bootstrap: &Bootstrap) {
        self.state.update(|state| *state = state.clone().loaded(bootstrap));
    }

    /// Credits `50 * quantity` tokens and returns the new balance.
    pub fn add_tokens(&self, quantity: u32) -> Result<i64, TokenError> {
        self.transition(|state| state.with_tokens_added(quantity))
    }

    /// Takes 500 tokens and returns the new balance.
    pub fn retract_tokens(&self) -> Result<i64, TokenError> {
        self.transition(GlobalState::with_tokens_retracted)
    }

    fn transition(
        &self,
        step: impl FnOnce(&GlobalState) -> Result<GlobalState, TokenError>,
    ) -> Result<i64, TokenError> {
        let next = self.state.with_untracked(step)?;
        let balance = next.balance().ok_or(TokenError::NoUser)?;
        self.state.set(next);
        Ok(balance)
    }
}

pub fn try_use_global_context() -> Result<GlobalContext, ContextError> {
    use_context::<GlobalContext>().ok_or(ContextError::OutsideProvider)
}

/// The app state for the current component.
///
/// # Panics
///
/// When called outside a [`GlobalProvider`].
pub fn use_global_context() -> GlobalContext {
    match try_use_global_context() {
        Ok(context) => context,
        Err(e) => panic!("{e}"),
    }
}

/// Makes a [`GlobalContext`] available to `children` and, once mounted in
/// the browser, resolves the current user.
#[component]
pub fn GlobalProvider(children: Children) -> impl IntoView {
    let context = GlobalContext::default();
    provide_context(context);

    // Effects only run in the browser, and this one tracks nothing, so the
    // bootstrap happens once per page load.
    Effect::new(move |_| {
        spawn_local(async move {
            let host = host::detect();
            let result = bootstrap(host.as_deref(), &ServerFnBalance).await;
            context.finish_loading(&result);
        });
    });

    children()
}
