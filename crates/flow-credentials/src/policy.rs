//! Autorización para compartir credenciales con agentes.

/// Petición de un agente para leer una credencial de un usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareRequest<'a> {
    pub user_id: &'a str,
    pub agent_id: &'a str,
    pub service: &'a str,
    pub key: &'a str,
}

pub trait SharePolicy: Send + Sync {
    fn allows(&self, request: &ShareRequest<'_>) -> bool;
}

/// Política por defecto: todo agente está autorizado.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl SharePolicy for AllowAll {
    fn allows(&self, _request: &ShareRequest<'_>) -> bool {
        true
    }
}

impl<F> SharePolicy for F where F: Fn(&ShareRequest<'_>) -> bool + Send + Sync
{
    fn allows(&self, request: &ShareRequest<'_>) -> bool {
        self(request)
    }
}
