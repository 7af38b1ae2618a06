//! `Workflow` y `Step`: valores declarativos propiedad del caller.
//!
//! Un `Workflow` no tiene ciclo de vida propio más allá de una invocación de
//! `execute_workflow`; el executor sólo lo lee. La lista de steps queda fija
//! durante toda la ejecución.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ExecutorError;

/// Secuencia ordenada de steps identificada por un id opaco.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Identificador provisto por el caller. No se exige unicidad global.
    pub id: String,
    /// Etiqueta opcional; los mensajes usan `id` cuando falta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Steps en orden de ejecución. Obligatorio al decodificar (puede ser vacío).
    pub steps: Vec<Step>,
}

/// Un step es puramente declarativo: el trabajo real lo hace el `StepRunner`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    /// Comando de shell, sólo lo interpreta el runner de comandos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, Value>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, steps: Vec<Step>) -> Self {
        Self { id: id.into(),
               name: None,
               steps }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Nombre usado en mensajes: `name` o, en su defecto, `id`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Decodifica un workflow desde JSON. Un documento sin `steps` o con
    /// tipos incorrectos es `InvalidWorkflow`.
    pub fn from_json(raw: &str) -> Result<Self, ExecutorError> {
        let wf: Workflow = serde_json::from_str(raw).map_err(|e| ExecutorError::InvalidWorkflow(e.to_string()))?;
        wf.validate()?;
        Ok(wf)
    }

    /// Reglas mínimas: id no vacío y todos los steps con nombre.
    pub fn validate(&self) -> Result<(), ExecutorError> {
        if self.id.trim().is_empty() {
            return Err(ExecutorError::InvalidWorkflow("workflow id must not be empty".into()));
        }
        if let Some(pos) = self.steps.iter().position(|s| s.name.trim().is_empty()) {
            return Err(ExecutorError::InvalidWorkflow(format!("step {} has an empty name", pos + 1)));
        }
        Ok(())
    }
}

impl Step {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               command: None,
               params: IndexMap::new() }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_name_falls_back_to_id() {
        let wf = Workflow::new("wf-1", vec![]);
        assert_eq!(wf.display_name(), "wf-1");
        assert_eq!(wf.with_name("Demo").display_name(), "Demo");
    }

    #[test]
    fn from_json_accepts_minimal_document() {
        let wf = Workflow::from_json(r#"{"id":"wf-1","name":"Demo","steps":[{"name":"Fetch"},{"name":"Process"}]}"#)
            .expect("valid workflow");
        assert_eq!(wf.len(), 2);
        assert_eq!(wf.steps[1].name, "Process");
        assert!(wf.steps[0].command.is_none());
    }

    #[test]
    fn from_json_rejects_missing_steps() {
        let err = Workflow::from_json(r#"{"id":"wf-1"}"#).unwrap_err();
        assert!(matches!(err, ExecutorError::InvalidWorkflow(ref m) if m.contains("steps")), "got {err:?}");
    }

    #[test]
    fn validate_rejects_blank_ids_and_step_names() {
        assert!(Workflow::new("  ", vec![]).validate().is_err());
        let err = Workflow::new("wf", vec![Step::new("ok"), Step::new("")]).validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid workflow: step 2 has an empty name");
    }

    #[test]
    fn step_params_keep_insertion_order() {
        let step = Step::new("s").with_param("zeta", json!(1)).with_param("alpha", json!(2));
        let keys: Vec<&str> = step.params.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
