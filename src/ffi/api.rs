//! Symbol resolution for the native library.

use libloading::{Library, Symbol};

use super::raw::*;
use crate::error::{Error, Result};

const BUFFER_PREFIX: &str = "ffi_ant_ffi_rustbuffer_";
const FUTURE_PREFIX: &str = "ffi_ant_ffi_rust_future_";
const FN_PREFIX: &str = "uniffi_ant_ffi_fn_";

/// Resolve one entry point and copy it out of the library.
///
/// # Safety
///
/// `T` must be the exact function pointer type of the exported symbol, and
/// the returned pointer must not outlive `lib`.
unsafe fn symbol<T: Copy>(lib: &Library, name: &str) -> Result<T> {
    let sym: Symbol<T> = lib
        .get(name.as_bytes())
        .map_err(|e| Error::Load(format!("{}: {}", name, e)))?;
    Ok(*sym)
}

unsafe fn object(lib: &Library, ty: &str) -> Result<ObjectAbi> {
    Ok(ObjectAbi {
        clone: symbol(lib, &format!("{}clone_{}", FN_PREFIX, ty))?,
        free: symbol(lib, &format!("{}free_{}", FN_PREFIX, ty))?,
    })
}

unsafe fn future<T>(lib: &Library, category: &str) -> Result<FutureAbi<T>> {
    Ok(FutureAbi {
        poll: symbol(lib, &format!("{}poll_{}", FUTURE_PREFIX, category))?,
        complete: symbol(lib, &format!("{}complete_{}", FUTURE_PREFIX, category))?,
        cancel: symbol(lib, &format!("{}cancel_{}", FUTURE_PREFIX, category))?,
        free: symbol(lib, &format!("{}free_{}", FUTURE_PREFIX, category))?,
    })
}

unsafe fn constructor<T: Copy>(lib: &Library, ty: &str, name: &str) -> Result<T> {
    symbol(lib, &format!("{}constructor_{}_{}", FN_PREFIX, ty, name))
}

unsafe fn method<T: Copy>(lib: &Library, ty: &str, name: &str) -> Result<T> {
    symbol(lib, &format!("{}method_{}_{}", FN_PREFIX, ty, name))
}

unsafe fn func<T: Copy>(lib: &Library, name: &str) -> Result<T> {
    symbol(lib, &format!("{}func_{}", FN_PREFIX, name))
}

unsafe fn address(lib: &Library, ty: &str) -> Result<AddressApi> {
    Ok(AddressApi {
        object: object(lib, ty)?,
        new: constructor(lib, ty, "new")?,
        from_hex: constructor(lib, ty, "from_hex")?,
        to_hex: method(lib, ty, "to_hex")?,
        to_bytes: method(lib, ty, "to_bytes")?,
    })
}

impl Api {
    /// Resolve every entry point this crate uses from a loaded library.
    ///
    /// # Safety
    ///
    /// `lib` must be the ant_ffi library, whose exports match the
    /// signatures in [`raw`](super::raw). The returned table must not be
    /// used after `lib` is unloaded.
    pub unsafe fn load(lib: &Library) -> Result<Api> {
        Ok(Api {
            buffers: BufferAbi {
                from_bytes: symbol(lib, &format!("{}from_bytes", BUFFER_PREFIX))?,
                free: symbol(lib, &format!("{}free", BUFFER_PREFIX))?,
            },
            futures: FutureTable {
                pointer: future(lib, "pointer")?,
                rust_buffer: future(lib, "rust_buffer")?,
                void: future(lib, "void")?,
            },
            self_encryption: SelfEncryptionApi {
                encrypt: func(lib, "encrypt")?,
                decrypt: func(lib, "decrypt")?,
            },
            chunk: ChunkApi {
                object: object(lib, "chunk")?,
                new: constructor(lib, "chunk", "new")?,
                value: method(lib, "chunk", "value")?,
                address: method(lib, "chunk", "address")?,
                network_address: method(lib, "chunk", "network_address")?,
                size: method(lib, "chunk", "size")?,
                is_too_big: method(lib, "chunk", "is_too_big")?,
                max_size: func(lib, "chunk_max_size")?,
                max_raw_size: func(lib, "chunk_max_raw_size")?,
            },
            chunk_address: ChunkAddressApi {
                address: address(lib, "chunkaddress")?,
                from_content: constructor(lib, "chunkaddress", "from_content")?,
            },
            data_address: address(lib, "dataaddress")?,
            data_map_chunk: DataMapChunkApi {
                object: object(lib, "datamapchunk")?,
                from_hex: constructor(lib, "datamapchunk", "from_hex")?,
                to_hex: method(lib, "datamapchunk", "to_hex")?,
                address: method(lib, "datamapchunk", "address")?,
            },
            network: NetworkApi {
                object: object(lib, "network")?,
                new: constructor(lib, "network", "new")?,
                custom: constructor(lib, "network", "custom")?,
            },
            wallet: WalletApi {
                object: object(lib, "wallet")?,
                from_private_key: constructor(lib, "wallet", "new_from_private_key")?,
                address: method(lib, "wallet", "address")?,
                balance_of_tokens: method(lib, "wallet", "balance_of_tokens")?,
            },
            client: ClientApi {
                object: object(lib, "client")?,
                init: constructor(lib, "client", "init")?,
                init_local: constructor(lib, "client", "init_local")?,
                data_put_public: method(lib, "client", "data_put_public")?,
                data_get_public: method(lib, "client", "data_get_public")?,
                data_put: method(lib, "client", "data_put")?,
                data_get: method(lib, "client", "data_get")?,
                data_cost: method(lib, "client", "data_cost")?,
                file_upload_public: method(lib, "client", "file_upload_public")?,
                file_download_public: method(lib, "client", "file_download_public")?,
                file_upload: method(lib, "client", "file_upload")?,
                file_download: method(lib, "client", "file_download")?,
                file_cost: method(lib, "client", "file_cost")?,
                chunk_put: method(lib, "client", "chunk_put")?,
                chunk_get: method(lib, "client", "chunk_get")?,
            },
        })
    }
}
