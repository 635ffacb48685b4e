use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Ошибки инкрементального словаря (`Dict`).
#[derive(Debug, Clone)]
pub enum DictError {
    /// При создании словаря не была предоставлена обязательная способность
    /// (`hash` или `eq`) политики.
    MissingCapability { capability: &'static str },
    /// Расширение или выделение новой записи не удалось: аллокатор отказал
    /// запрашиваемому объёму памяти.
    ///
    /// Операция, вызвавшая ошибку, не оставляет частично связанных записей —
    /// словарь остаётся в состоянии, предшествовавшем вызову.
    ResourceExhausted { requested: usize },
}

impl std::fmt::Display for DictError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::MissingCapability { capability } => {
                write!(f, "policy is missing required capability: {capability}")
            }
            Self::ResourceExhausted { requested } => {
                write!(f, "allocation of {requested} slots failed")
            }
        }
    }
}

impl std::error::Error for DictError {}

impl ErrorExt for DictError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCapability { .. } => StatusCode::InvalidArgs,
            Self::ResourceExhausted { .. } => StatusCode::ResourceExhausted,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::MissingCapability { capability } => {
                format!("missing required capability: {capability}")
            }
            Self::ResourceExhausted { .. } => "out of memory".to_string(),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "dict".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        if let Self::MissingCapability { capability } = self {
            tags.push(("capability", capability.to_string()));
        }
        tags
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
