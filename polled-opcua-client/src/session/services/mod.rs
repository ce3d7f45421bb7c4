//! The typed service surface: one synchronous and one asynchronous shim per
//! service pair, all thin wrappers over the generic dispatcher.

mod attribute;
mod method;
mod monitored_item;
mod node_management;
mod query;
mod subscription;
mod view;

/// Generates the synchronous and asynchronous shim for one service pair.
macro_rules! service_shim {
    ($(#[$doc:meta])* $sync_name:ident, $async_name:ident, $req:ty) => {
        impl crate::Client {
            $(#[$doc])*
            pub fn $sync_name(
                &mut self,
                request: $req,
            ) -> Result<<$req as opcua_types::UaRequest>::Response, opcua_types::StatusCode> {
                self.send(request)
            }

            $(#[$doc])*
            ///
            /// Asynchronous variant: returns the request id immediately, the
            /// callback fires when the response arrives or the request fails.
            pub fn $async_name(
                &mut self,
                request: $req,
                callback: impl FnOnce(
                        &mut crate::Client,
                        u32,
                        <$req as opcua_types::UaRequest>::Response,
                    ) + 'static,
            ) -> Result<u32, opcua_types::StatusCode> {
                self.send_async(request, callback)
            }
        }
    };
}

pub(crate) use service_shim;
