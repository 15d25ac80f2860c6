//! Transform composition
//!
//! Transforms run left to right: for `t1, t2, .., tn` the pipeline is
//! `tn(..(t2(t1(bundle))))`. A trailing `Propagate` flag lets the source
//! event keep bubbling past the proxy.

use serde_json::Value;

use crate::bundle::{EventBundle, Transform};
use crate::error::{ProxyError, ProxyResult};

/// One argument to [`ComposedTransform::compose`]
#[derive(Debug, Clone)]
pub enum ProxyArg {
    /// A pipeline stage
    Transform(Transform),
    /// Source propagation override. Only valid as the last argument.
    Propagate(bool),
    /// Any other value. Never valid.
    Literal(Value),
}

impl ProxyArg {
    /// Kind name used in error reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transform(_) => "transform",
            Self::Propagate(_) => "boolean",
            Self::Literal(Value::Null) => "null",
            Self::Literal(Value::Bool(_)) => "boolean",
            Self::Literal(Value::Number(_)) => "number",
            Self::Literal(Value::String(_)) => "string",
            Self::Literal(Value::Array(_)) => "array",
            Self::Literal(Value::Object(_)) => "object",
        }
    }
}

impl From<Transform> for ProxyArg {
    fn from(transform: Transform) -> Self {
        Self::Transform(transform)
    }
}

impl From<bool> for ProxyArg {
    fn from(propagate: bool) -> Self {
        Self::Propagate(propagate)
    }
}

impl From<Value> for ProxyArg {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for ProxyArg {
    fn from(value: &str) -> Self {
        Self::Literal(Value::String(value.to_string()))
    }
}

impl From<String> for ProxyArg {
    fn from(value: String) -> Self {
        Self::Literal(Value::String(value))
    }
}

/// Build a `Vec<ProxyArg>` from transforms and an optional trailing flag.
///
/// ```
/// use void_event_proxy::{event_transform, proxy_args, ProxyArg};
///
/// let args = proxy_args![event_transform(|_| "targetEvent".to_string()), true];
/// assert!(matches!(args[1], ProxyArg::Propagate(true)));
/// ```
#[macro_export]
macro_rules! proxy_args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::ProxyArg::from($arg)),*]
    };
}

/// An ordered transform pipeline plus the source propagation flag
#[derive(Debug, Clone, Default)]
pub struct ComposedTransform {
    stages: Vec<Transform>,
    propagate_source: bool,
}

impl ComposedTransform {
    /// Compose stages in the given order. Source propagation is suppressed.
    pub fn new(stages: Vec<Transform>) -> Self {
        Self {
            stages,
            propagate_source: false,
        }
    }

    /// Append a stage
    pub fn then(mut self, stage: Transform) -> Self {
        self.stages.push(stage);
        self
    }

    /// Let the source event keep propagating
    pub fn with_propagate_source(mut self, propagate: bool) -> Self {
        self.propagate_source = propagate;
        self
    }

    /// Compose a positional argument list.
    ///
    /// A trailing `Propagate` sets the flag and is not a stage. Every other
    /// argument must be a `Transform`.
    pub fn compose<I>(args: I) -> ProxyResult<Self>
    where
        I: IntoIterator<Item = ProxyArg>,
    {
        let mut args: Vec<ProxyArg> = args.into_iter().collect();

        let trailing = match args.last() {
            Some(ProxyArg::Propagate(propagate)) => Some(*propagate),
            _ => None,
        };
        if trailing.is_some() {
            args.pop();
        }

        let stages = args
            .into_iter()
            .enumerate()
            .map(|(position, arg)| match arg {
                ProxyArg::Transform(stage) => Ok(stage),
                other => Err(ProxyError::InvalidArgument {
                    position,
                    found: other.kind(),
                }),
            })
            .collect::<ProxyResult<Vec<_>>>()?;

        Ok(Self {
            stages,
            propagate_source: trailing.unwrap_or(false),
        })
    }

    /// Whether the source event keeps propagating
    pub fn propagate_source(&self) -> bool {
        self.propagate_source
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order
    pub fn apply(&self, bundle: EventBundle) -> EventBundle {
        self.stages.iter().fold(bundle, |bundle, stage| stage.apply(bundle))
    }
}
