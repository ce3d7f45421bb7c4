// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! The [`TypeLoader`] trait and associated tools.
//!
//! When deserializing from the OPC UA binary format, extension objects can contain
//! a large variety of structures, including custom ones defined by extensions to the
//! standard. In order to work with these, each set of types implements [`TypeLoader`],
//! and a list of type loaders is consulted when a body needs to be decoded.

use std::{io::Read, sync::Arc};

use hashbrown::HashMap;

use crate::{
    encoding::{BinaryDecodable, DecodingOptions, EncodingResult},
    extension_object::DynEncodable,
};

type BinaryLoadFun = fn(&mut dyn Read, &DecodingOptions) -> EncodingResult<Box<dyn DynEncodable>>;

/// Convenience method to decode a type into a `DynEncodable`.
pub fn binary_decode_to_enc<T: DynEncodable + BinaryDecodable>(
    stream: &mut dyn Read,
    options: &DecodingOptions,
) -> EncodingResult<Box<dyn DynEncodable>> {
    Ok(Box::new(T::decode(stream, options)?))
}

#[derive(Default)]
/// Type used by type loaders to store deserialization functions, keyed by the
/// numeric id of the data type and its binary encoding.
pub struct TypeLoaderInstance {
    binary_types: HashMap<u32, BinaryLoadFun>,
}

impl TypeLoaderInstance {
    /// Create a new empty type loader instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binary type decoding function, addressable both by the data type id
    /// and the id of the binary encoding.
    pub fn add_binary_type(&mut self, data_type: u32, encoding_type: u32, fun: BinaryLoadFun) {
        self.binary_types.insert(data_type, fun);
        self.binary_types.insert(encoding_type, fun);
    }

    /// Decode the type with ID `ty` using binary encoding.
    pub fn decode_binary(
        &self,
        ty: u32,
        stream: &mut dyn Read,
        options: &DecodingOptions,
    ) -> Option<EncodingResult<Box<dyn DynEncodable>>> {
        let fun = self.binary_types.get(&ty)?;
        Some(fun(stream, options))
    }
}

/// Trait implemented by a set of types that can be loaded from extension object bodies.
pub trait TypeLoader {
    /// Try to decode the type with numeric id `ty` from the stream. Returns `None`
    /// when this loader does not know the type.
    fn load_from_binary(
        &self,
        ty: u32,
        stream: &mut dyn Read,
        options: &DecodingOptions,
    ) -> Option<EncodingResult<Box<dyn DynEncodable>>>;
}

/// An ordered collection of type loaders consulted in turn when decoding an
/// extension object body.
#[derive(Clone, Default)]
pub struct TypeLoaderCollection {
    loaders: Vec<Arc<dyn TypeLoader>>,
}

impl TypeLoaderCollection {
    /// Create a new collection containing only the built-in type loader.
    pub fn new() -> Self {
        let mut slf = Self::default();
        slf.add(Arc::new(crate::service_types::CoreTypeLoader));
        slf
    }

    /// Add a type loader to the collection. There is no mechanism to ensure
    /// uniqueness; adding the same loader twice works but costs a redundant lookup.
    pub fn add(&mut self, loader: Arc<dyn TypeLoader>) {
        self.loaders.push(loader);
    }

    /// Try each loader in turn to decode the type with numeric id `ty`.
    pub fn load_from_binary(
        &self,
        ty: u32,
        stream: &mut dyn Read,
        options: &DecodingOptions,
    ) -> Option<EncodingResult<Box<dyn DynEncodable>>> {
        for loader in &self.loaders {
            if let Some(r) = loader.load_from_binary(ty, stream, options) {
                return Some(r);
            }
        }
        None
    }
}
