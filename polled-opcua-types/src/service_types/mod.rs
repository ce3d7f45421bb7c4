// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Hand-written service message types for the supported service sets,
//! encoded with the binary derive macros.

mod attribute;
mod channel;
mod discovery;
mod fault;
mod method;
mod monitored_item;
mod node_management;
mod query;
mod session;
mod subscription;
mod view;

pub use attribute::*;
pub use channel::*;
pub use discovery::*;
pub use fault::*;
pub use method::*;
pub use monitored_item::*;
pub use node_management::*;
pub use query::*;
pub use session::*;
pub use subscription::*;
pub use view::*;

use std::io::Read;

use lazy_static::lazy_static;

use crate::{
    encoding::{DecodingOptions, EncodingResult},
    extension_object::DynEncodable,
    type_loader::{binary_decode_to_enc, TypeLoader, TypeLoaderInstance},
};

lazy_static! {
    static ref CORE_TYPES: TypeLoaderInstance = {
        let mut inst = TypeLoaderInstance::new();
        inst.add_binary_type(319, 321, binary_decode_to_enc::<AnonymousIdentityToken>);
        inst.add_binary_type(322, 324, binary_decode_to_enc::<UserNameIdentityToken>);
        inst.add_binary_type(809, 811, binary_decode_to_enc::<DataChangeNotification>);
        inst.add_binary_type(818, 820, binary_decode_to_enc::<StatusChangeNotification>);
        inst
    };
}

/// Type loader for the structures defined in the standard namespace that are
/// carried inside extension object bodies.
pub struct CoreTypeLoader;

impl TypeLoader for CoreTypeLoader {
    fn load_from_binary(
        &self,
        ty: u32,
        stream: &mut dyn Read,
        options: &DecodingOptions,
    ) -> Option<EncodingResult<Box<dyn DynEncodable>>> {
        CORE_TYPES.decode_binary(ty, stream, options)
    }
}
