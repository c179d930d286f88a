//! Raw C types and entry point signatures of the ant_ffi ABI.
//!
//! This module contains the `#[repr(C)]` layouts shared with the native
//! library and the function pointer tables used to reach it.
//! Users should prefer the safe Rust wrappers in the parent modules.

use super::handles::{RawObject, RustFutureHandle};

/// Status code written into [`RustCallStatus::code`].
pub type CallStatusCode = i8;

// Call status codes
pub const CALL_SUCCESS: CallStatusCode = 0;
pub const CALL_ERROR: CallStatusCode = 1;
pub const CALL_UNEXPECTED_ERROR: CallStatusCode = 2;
pub const CALL_CANCELLED: CallStatusCode = 3;

// Poll results delivered to the continuation callback
pub const POLL_READY: i8 = 0;
pub const POLL_MAYBE_READY: i8 = 1;

/// Buffer allocated by the native side.
///
/// Always paired with an explicit free entry point; the host never frees
/// `data` with its own allocator.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RustBuffer {
    pub capacity: u64,
    pub len: u64,
    pub data: *mut u8,
}

impl RustBuffer {
    /// The empty buffer, used for absent values and empty strings.
    pub const fn empty() -> Self {
        Self {
            capacity: 0,
            len: 0,
            data: std::ptr::null_mut(),
        }
    }

    /// Check if the buffer carries no allocation.
    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    /// View the buffer contents.
    ///
    /// # Safety
    ///
    /// `data` must point to at least `len` readable bytes that stay alive
    /// for the returned lifetime.
    pub unsafe fn as_slice(&self) -> &[u8] {
        if self.data.is_null() || self.len == 0 {
            return &[];
        }
        std::slice::from_raw_parts(self.data, self.len as usize)
    }
}

impl Default for RustBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

/// Host-owned bytes lent to the native side for a one-way copy.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ForeignBytes {
    pub len: i32,
    pub data: *const u8,
}

/// Out-parameter receiving the outcome of a native call.
#[repr(C)]
#[derive(Debug)]
pub struct RustCallStatus {
    pub code: CallStatusCode,
    pub error_buf: RustBuffer,
}

impl Default for RustCallStatus {
    fn default() -> Self {
        Self {
            code: CALL_SUCCESS,
            error_buf: RustBuffer::empty(),
        }
    }
}

/// Callback invoked by native code, on a thread it owns, to report
/// progress of a polled future.
pub type ContinuationCallback = extern "C" fn(callback_data: u64, poll_result: i8);

// Buffer management
pub type RustBufferFromBytesFn =
    unsafe extern "C" fn(bytes: ForeignBytes, status: *mut RustCallStatus) -> RustBuffer;
pub type RustBufferFreeFn = unsafe extern "C" fn(buf: RustBuffer, status: *mut RustCallStatus);

// Object lifecycle
pub type CloneObjectFn =
    unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> RawObject;
pub type FreeObjectFn = unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus);

// Future polling
pub type FuturePollFn = unsafe extern "C" fn(
    handle: RustFutureHandle,
    callback: ContinuationCallback,
    callback_data: u64,
);
pub type FutureCompleteFn<T> =
    unsafe extern "C" fn(handle: RustFutureHandle, status: *mut RustCallStatus) -> T;
pub type FutureCancelFn = unsafe extern "C" fn(handle: RustFutureHandle);
pub type FutureFreeFn = unsafe extern "C" fn(handle: RustFutureHandle);

/// Native allocator entry points.
#[derive(Debug, Clone, Copy)]
pub struct BufferAbi {
    pub from_bytes: RustBufferFromBytesFn,
    pub free: RustBufferFreeFn,
}

/// Clone/free pair of one native object type.
#[derive(Debug, Clone, Copy)]
pub struct ObjectAbi {
    pub clone: CloneObjectFn,
    pub free: FreeObjectFn,
}

/// poll/complete/cancel/free quartet of one future result category.
#[derive(Debug)]
pub struct FutureAbi<T> {
    pub poll: FuturePollFn,
    pub complete: FutureCompleteFn<T>,
    pub cancel: FutureCancelFn,
    pub free: FutureFreeFn,
}

// Function pointers are Copy regardless of T.
impl<T> Clone for FutureAbi<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FutureAbi<T> {}

/// The three future result categories exposed by the native library.
#[derive(Debug, Clone, Copy)]
pub struct FutureTable {
    pub pointer: FutureAbi<RawObject>,
    pub rust_buffer: FutureAbi<RustBuffer>,
    pub void: FutureAbi<()>,
}

/// Self-encryption functions.
#[derive(Debug, Clone, Copy)]
pub struct SelfEncryptionApi {
    pub encrypt: unsafe extern "C" fn(data: RustBuffer, status: *mut RustCallStatus) -> RustBuffer,
    pub decrypt: unsafe extern "C" fn(data: RustBuffer, status: *mut RustCallStatus) -> RustBuffer,
}

/// Chunk object and data constants.
#[derive(Debug, Clone, Copy)]
pub struct ChunkApi {
    pub object: ObjectAbi,
    pub new: unsafe extern "C" fn(value: RustBuffer, status: *mut RustCallStatus) -> RawObject,
    pub value: unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> RustBuffer,
    pub address: unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> RawObject,
    pub network_address:
        unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> RustBuffer,
    pub size: unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> u64,
    pub is_too_big: unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> i8,
    pub max_size: unsafe extern "C" fn(status: *mut RustCallStatus) -> u64,
    pub max_raw_size: unsafe extern "C" fn(status: *mut RustCallStatus) -> u64,
}

/// Address objects constructed from bytes or hex (chunk and data addresses).
#[derive(Debug, Clone, Copy)]
pub struct AddressApi {
    pub object: ObjectAbi,
    pub new: unsafe extern "C" fn(bytes: RustBuffer, status: *mut RustCallStatus) -> RawObject,
    pub from_hex: unsafe extern "C" fn(hex: RustBuffer, status: *mut RustCallStatus) -> RawObject,
    pub to_hex: unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> RustBuffer,
    pub to_bytes: unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> RustBuffer,
}

/// Chunk address extras on top of [`AddressApi`].
#[derive(Debug, Clone, Copy)]
pub struct ChunkAddressApi {
    pub address: AddressApi,
    pub from_content:
        unsafe extern "C" fn(data: RustBuffer, status: *mut RustCallStatus) -> RawObject,
}

/// Data map chunk object.
#[derive(Debug, Clone, Copy)]
pub struct DataMapChunkApi {
    pub object: ObjectAbi,
    pub from_hex: unsafe extern "C" fn(hex: RustBuffer, status: *mut RustCallStatus) -> RawObject,
    pub to_hex: unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> RustBuffer,
    pub address: unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> RustBuffer,
}

/// Network configuration object.
#[derive(Debug, Clone, Copy)]
pub struct NetworkApi {
    pub object: ObjectAbi,
    pub new: unsafe extern "C" fn(local: i8, status: *mut RustCallStatus) -> RawObject,
    pub custom: unsafe extern "C" fn(
        rpc_url: RustBuffer,
        payment_token_address: RustBuffer,
        data_payments_address: RustBuffer,
        royalties_pk_hex: RustBuffer,
        status: *mut RustCallStatus,
    ) -> RawObject,
}

/// EVM wallet object.
#[derive(Debug, Clone, Copy)]
pub struct WalletApi {
    pub object: ObjectAbi,
    pub from_private_key: unsafe extern "C" fn(
        network: RawObject,
        private_key: RustBuffer,
        status: *mut RustCallStatus,
    ) -> RawObject,
    pub address: unsafe extern "C" fn(ptr: RawObject, status: *mut RustCallStatus) -> RustBuffer,
    pub balance_of_tokens: unsafe extern "C" fn(ptr: RawObject) -> RustFutureHandle,
}

/// Network client object. Every method returns a future handle.
#[derive(Debug, Clone, Copy)]
pub struct ClientApi {
    pub object: ObjectAbi,
    pub init: unsafe extern "C" fn() -> RustFutureHandle,
    pub init_local: unsafe extern "C" fn() -> RustFutureHandle,
    pub data_put_public:
        unsafe extern "C" fn(ptr: RawObject, data: RustBuffer, payment: RustBuffer) -> RustFutureHandle,
    pub data_get_public:
        unsafe extern "C" fn(ptr: RawObject, address_hex: RustBuffer) -> RustFutureHandle,
    pub data_put:
        unsafe extern "C" fn(ptr: RawObject, data: RustBuffer, payment: RustBuffer) -> RustFutureHandle,
    pub data_get: unsafe extern "C" fn(ptr: RawObject, data_map: RawObject) -> RustFutureHandle,
    pub data_cost: unsafe extern "C" fn(ptr: RawObject, data: RustBuffer) -> RustFutureHandle,
    pub file_upload_public: unsafe extern "C" fn(
        ptr: RawObject,
        file_path: RustBuffer,
        payment: RustBuffer,
    ) -> RustFutureHandle,
    pub file_download_public: unsafe extern "C" fn(
        ptr: RawObject,
        address: RawObject,
        dest_path: RustBuffer,
    ) -> RustFutureHandle,
    pub file_upload: unsafe extern "C" fn(
        ptr: RawObject,
        file_path: RustBuffer,
        payment: RustBuffer,
    ) -> RustFutureHandle,
    pub file_download: unsafe extern "C" fn(
        ptr: RawObject,
        data_map: RawObject,
        dest_path: RustBuffer,
    ) -> RustFutureHandle,
    pub file_cost: unsafe extern "C" fn(ptr: RawObject, file_path: RustBuffer) -> RustFutureHandle,
    pub chunk_put:
        unsafe extern "C" fn(ptr: RawObject, data: RustBuffer, payment: RustBuffer) -> RustFutureHandle,
    pub chunk_get: unsafe extern "C" fn(ptr: RawObject, address: RawObject) -> RustFutureHandle,
}

/// Every entry point of the native library used by this crate.
#[derive(Debug, Clone, Copy)]
pub struct Api {
    pub buffers: BufferAbi,
    pub futures: FutureTable,
    pub self_encryption: SelfEncryptionApi,
    pub chunk: ChunkApi,
    pub chunk_address: ChunkAddressApi,
    pub data_address: AddressApi,
    pub data_map_chunk: DataMapChunkApi,
    pub network: NetworkApi,
    pub wallet: WalletApi,
    pub client: ClientApi,
}
