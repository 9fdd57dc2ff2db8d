//! Native convenience wrappers
//!
//! Narrow helpers installed on host types outside the class hierarchy.

use super::Runtime;
use crate::value::{Function, Value};
use crate::BootError;

/// Host type the socket helper targets
pub const SOCKET_TYPE: &str = "WebSocket";

/// Listener property to connection slot
const SOCKET_CALLBACKS: [(&str, &str); 4] = [
    ("open", "onopen"),
    ("close", "onclose"),
    ("error", "onerror"),
    ("message", "onmessage"),
];

/// Install a static `connect(uri, listener)` on the socket host type
///
/// The helper constructs a connection through the host constructor and wires
/// the listener's `open`, `close`, `error` and `message` callbacks onto it.
/// Returns false when the host has no socket type.
pub fn install_socket_connect(rt: &Runtime) -> bool {
    let connect = Function::new("WebSocket.connect", |rt, _this, args| {
        let uri = args.first().cloned().unwrap_or_default();
        let connection = rt.construct_host(SOCKET_TYPE, &[uri])?;
        let socket = connection.as_object().ok_or_else(|| {
            BootError::TypeError(format!(
                "{} constructor returned {}",
                SOCKET_TYPE,
                connection.type_name()
            ))
        })?;

        if let Some(Value::Object(listener)) = args.get(1) {
            for (callback, slot) in SOCKET_CALLBACKS {
                if let Some(handler) = listener.get(callback) {
                    socket.set(slot, handler);
                }
            }
        }
        Ok(connection.clone())
    });

    rt.install_static_on(SOCKET_TYPE, [("connect", Value::Function(connect))])
}
