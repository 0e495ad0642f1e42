mod local_credential;
mod password;
mod reconciler;
mod remote_credential;
mod support;
mod webhook_signature;
