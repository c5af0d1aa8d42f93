//! Named callbacks a theme registers with the renderer.
//!
//! Hosts invoke hooks by name through `js` records; the renderer never
//! evaluates host-supplied code. Variable handlers override template
//! variables and a proxy may intercept records before rendering.
//!
//! # Example
//!
//! ```
//! use psi_chatview::{HookRegistry, Segment, Transcript};
//! use serde_json::Value;
//!
//! let mut hooks = HookRegistry::default();
//! hooks.register_hook(
//!     "note",
//!     |transcript: &mut Transcript, args: &[Value]| -> psi_chatview::Result<()> {
//!         let text = args.first().and_then(Value::as_str).unwrap_or_default();
//!         transcript.append(vec![Segment::Html(format!("<i>{text}</i>"))]);
//!         Ok(())
//!     },
//! );
//! assert!(hooks.has_hook("note"));
//! ```

use std::collections::HashMap;

use serde_json::Value;

use psi_chatview_model::{ChatEvent, HostRecord};

use crate::error::{ChatViewError, Result};
use crate::template::Template;
use crate::transcript::Transcript;

/// A callback invoked by name.
pub trait Hook {
    /// # Errors
    ///
    /// A failure is reported in the transcript; the session keeps running.
    fn call(&self, transcript: &mut Transcript, args: &[Value]) -> Result<()>;
}

impl<F> Hook for F
where
    F: Fn(&mut Transcript, &[Value]) -> Result<()>,
{
    fn call(&self, transcript: &mut Transcript, args: &[Value]) -> Result<()> {
        self(transcript, args)
    }
}

/// Computes the value of a template variable.
pub trait VarHandler {
    fn value(&self, event: &ChatEvent) -> String;
}

impl<F> VarHandler for F
where
    F: Fn(&ChatEvent) -> String,
{
    fn value(&self, event: &ChatEvent) -> String {
        self(event)
    }
}

/// What a proxy decided about a record.
#[derive(Debug, Clone)]
pub enum ProxyDecision {
    /// Process normally.
    Continue,
    /// Drop the record.
    Stop,
    /// Render with this template instead of the theme's.
    Render(Template),
}

/// Sees every record before the renderer does.
pub trait Proxy {
    fn filter(&self, record: &HostRecord) -> ProxyDecision;
}

impl<F> Proxy for F
where
    F: Fn(&HostRecord) -> ProxyDecision,
{
    fn filter(&self, record: &HostRecord) -> ProxyDecision {
        self(record)
    }
}

#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Box<dyn Hook>>,
    vars: HashMap<String, Box<dyn VarHandler>>,
    proxy: Option<Box<dyn Proxy>>,
}

impl HookRegistry {
    /// Register a hook. An earlier hook with the same name is replaced.
    pub fn register_hook(&mut self, name: impl Into<String>, hook: impl Hook + 'static) {
        self.hooks.insert(name.into(), Box::new(hook));
    }

    /// Register a handler for template variable `name`.
    pub fn register_var(&mut self, name: impl Into<String>, handler: impl VarHandler + 'static) {
        self.vars.insert(name.into(), Box::new(handler));
    }

    pub fn set_proxy(&mut self, proxy: impl Proxy + 'static) {
        self.proxy = Some(Box::new(proxy));
    }

    #[must_use]
    pub fn has_hook(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    #[must_use]
    pub fn var(&self, name: &str) -> Option<&dyn VarHandler> {
        self.vars.get(name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn proxy(&self) -> Option<&dyn Proxy> {
        self.proxy.as_deref()
    }

    /// Invoke hook `name`.
    pub fn call(&self, name: &str, transcript: &mut Transcript, args: &[Value]) -> Result<()> {
        let hook = self
            .hooks
            .get(name)
            .ok_or_else(|| ChatViewError::UnknownHook(name.to_string()))?;
        hook.call(transcript, args)
    }

    /// Registered hook names, sorted.
    #[must_use]
    pub fn hook_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hook_names())
            .field("vars", &self.vars.len())
            .field("proxy", &self.proxy.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Segment;

    #[test]
    fn test_call_registered_hook() {
        let mut hooks = HookRegistry::default();
        hooks.register_hook(
            "mark",
            |transcript: &mut Transcript, args: &[Value]| -> Result<()> {
                let text = args
                    .first()
                    .and_then(Value::as_str)
                    .ok_or_else(|| ChatViewError::hook("mark", "missing text"))?;
                transcript.append(vec![Segment::Html(text.to_string())]);
                Ok(())
            },
        );
        let mut transcript = Transcript::new();
        hooks
            .call("mark", &mut transcript, &[Value::from("hi")])
            .unwrap();
        assert_eq!(transcript.to_html(), "hi");
        assert!(matches!(
            hooks.call("mark", &mut transcript, &[]),
            Err(ChatViewError::Hook { .. })
        ));
        assert!(matches!(
            hooks.call("nope", &mut transcript, &[]),
            Err(ChatViewError::UnknownHook(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_var_handler() {
        let mut hooks = HookRegistry::default();
        hooks.register_var("shout", |event: &ChatEvent| {
            event.message.clone().unwrap_or_default().to_uppercase()
        });
        let event = ChatEvent::chat("bob", "hey", false);
        assert_eq!(hooks.var("shout").map(|h| h.value(&event)).as_deref(), Some("HEY"));
        assert!(hooks.var("whisper").is_none());
    }
}
