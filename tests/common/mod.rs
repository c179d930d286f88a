//! An in-process implementation of the ant_ffi ABI for integration tests.
//!
//! Every entry point is an `extern "C"` function following the native
//! library's conventions: object arguments are owned clones that the callee
//! consumes, buffer arguments are consumed, strings travel raw and byte
//! sequences length-prefixed. The "network" is a process-wide map.
//!
//! All allocations, object references and futures are counted per thread.
//! Native calls run on the caller's thread, so a test can check that it
//! left nothing behind.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::mem::ManuallyDrop;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::thread;
use std::time::Duration;

use ant::ffi::*;
use ant::{Library, LibraryOptions};
use parking_lot::Mutex;

pub const CHUNK_MAX_SIZE: u64 = 4 * 1024 * 1024;
pub const CHUNK_MAX_RAW_SIZE: u64 = CHUNK_MAX_SIZE - 4096;

/// Address whose fetch never completes.
pub const PENDING_ADDRESS: &str = "pending";

thread_local! {
    static LIVE_BUFFERS: Cell<isize> = const { Cell::new(0) };
    static LIVE_OBJECTS: Cell<isize> = const { Cell::new(0) };
    static LIVE_FUTURES: Cell<isize> = const { Cell::new(0) };
    static POLLS: Cell<usize> = const { Cell::new(0) };
    static CANCELS: Cell<usize> = const { Cell::new(0) };
}

fn bump<T: Copy + std::ops::Add<Output = T> + 'static>(
    key: &'static std::thread::LocalKey<Cell<T>>,
    by: T,
) {
    key.with(|c| c.set(c.get() + by));
}

/// Counters for everything the fake library handed out on this thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub live_buffers: isize,
    pub live_objects: isize,
    pub live_futures: isize,
    pub polls: usize,
    pub cancels: usize,
}

pub fn stats() -> Stats {
    Stats {
        live_buffers: LIVE_BUFFERS.with(Cell::get),
        live_objects: LIVE_OBJECTS.with(Cell::get),
        live_futures: LIVE_FUTURES.with(Cell::get),
        polls: POLLS.with(Cell::get),
        cancels: CANCELS.with(Cell::get),
    }
}

/// Assert that everything allocated since `before` was released.
pub fn assert_balanced(before: Stats) {
    let now = stats();
    assert_eq!(now.live_buffers, before.live_buffers, "leaked buffers");
    assert_eq!(now.live_objects, before.live_objects, "leaked objects");
    assert_eq!(now.live_futures, before.live_futures, "leaked futures");
}

/// A library backed by this module.
pub fn library() -> Library {
    Library::from_api(api(), LibraryOptions::default())
}

/// A library whose async calls time out after `timeout`.
pub fn library_with_timeout(timeout: Duration) -> Library {
    Library::from_api(
        api(),
        LibraryOptions {
            default_timeout: Some(timeout),
        },
    )
}

// ---------------------------------------------------------------------------
// Buffers

pub fn alloc(data: &[u8]) -> RustBuffer {
    if data.is_empty() {
        return RustBuffer::empty();
    }
    bump(&LIVE_BUFFERS, 1);
    let mut v = ManuallyDrop::new(data.to_vec());
    RustBuffer {
        capacity: v.capacity() as u64,
        len: v.len() as u64,
        data: v.as_mut_ptr(),
    }
}

unsafe fn release(buf: RustBuffer) {
    if buf.data.is_null() {
        return;
    }
    bump(&LIVE_BUFFERS, -1);
    drop(Vec::from_raw_parts(buf.data, buf.len as usize, buf.capacity as usize));
}

/// Consume an argument buffer, returning its contents.
unsafe fn take(buf: RustBuffer) -> Vec<u8> {
    let data = buf.as_slice().to_vec();
    release(buf);
    data
}

/// Consume a length-prefixed byte argument.
unsafe fn take_bytes(buf: RustBuffer) -> Result<Vec<u8>, String> {
    let data = take(buf);
    if data.len() < 4 {
        return Err("missing length prefix".to_string());
    }
    let len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if len != data.len() - 4 {
        return Err("length prefix mismatch".to_string());
    }
    Ok(data[4..].to_vec())
}

/// Consume a raw string argument.
unsafe fn take_string(buf: RustBuffer) -> String {
    String::from_utf8_lossy(&take(buf)).into_owned()
}

/// Frame bytes the way the library returns byte sequences.
fn framed(data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(data);
    out
}

unsafe fn fail(status: *mut RustCallStatus, message: &str) {
    (*status).code = CALL_ERROR;
    (*status).error_buf = alloc(message.as_bytes());
}

unsafe extern "C" fn rustbuffer_from_bytes(
    bytes: ForeignBytes,
    _status: *mut RustCallStatus,
) -> RustBuffer {
    if bytes.len <= 0 {
        return RustBuffer::empty();
    }
    alloc(std::slice::from_raw_parts(bytes.data, bytes.len as usize))
}

unsafe extern "C" fn rustbuffer_free(buf: RustBuffer, _status: *mut RustCallStatus) {
    release(buf);
}

// ---------------------------------------------------------------------------
// Objects

#[derive(Debug, Clone)]
pub enum Value {
    Chunk(Vec<u8>),
    Address(Vec<u8>),
    DataMap(Vec<u8>),
    Network { local: bool, rpc_url: String },
    Wallet { key: String },
    Client { local: bool },
}

fn new_object(value: Value) -> RawObject {
    bump(&LIVE_OBJECTS, 1);
    RawObject::from_wire(Arc::into_raw(Arc::new(value)) as usize as u64)
}

/// Take ownership of one object reference.
unsafe fn take_object(ptr: RawObject) -> Option<Arc<Value>> {
    if !ptr.is_valid() {
        return None;
    }
    bump(&LIVE_OBJECTS, -1);
    Some(Arc::from_raw(ptr.as_ptr() as *const Value))
}

unsafe extern "C" fn clone_object(ptr: RawObject, _status: *mut RustCallStatus) -> RawObject {
    bump(&LIVE_OBJECTS, 1);
    Arc::increment_strong_count(ptr.as_ptr() as *const Value);
    ptr
}

unsafe extern "C" fn free_object(ptr: RawObject, _status: *mut RustCallStatus) {
    drop(take_object(ptr));
}

fn object_abi() -> ObjectAbi {
    ObjectAbi {
        clone: clone_object,
        free: free_object,
    }
}

// ---------------------------------------------------------------------------
// Futures

pub enum Outcome {
    Buffer(Vec<u8>),
    Record(Box<dyn FnOnce() -> Vec<u8> + Send>),
    Object(Value),
    Unit,
    Error(String),
    Pending,
}

struct FakeFuture {
    outcome: Mutex<Option<Outcome>>,
    polls: AtomicUsize,
}

fn new_future(outcome: Outcome) -> RustFutureHandle {
    bump(&LIVE_FUTURES, 1);
    let future = Arc::new(FakeFuture {
        outcome: Mutex::new(Some(outcome)),
        polls: AtomicUsize::new(0),
    });
    RustFutureHandle::new(Arc::into_raw(future) as usize as u64)
}

unsafe fn future<'a>(handle: RustFutureHandle) -> &'a FakeFuture {
    &*(handle.get() as usize as *const FakeFuture)
}

unsafe fn take_outcome(handle: RustFutureHandle) -> Option<Outcome> {
    future(handle).outcome.lock().take()
}

// Reports "maybe ready" on the first poll and ready on the next, from a
// thread of its own.
unsafe extern "C" fn future_poll(
    handle: RustFutureHandle,
    callback: ContinuationCallback,
    data: u64,
) {
    bump(&POLLS, 1);
    let future = future(handle);
    if matches!(*future.outcome.lock(), Some(Outcome::Pending)) {
        return;
    }
    let signal = if future.polls.fetch_add(1, Ordering::SeqCst) == 0 {
        POLL_MAYBE_READY
    } else {
        POLL_READY
    };
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(1));
        callback(data, signal);
    });
}

unsafe extern "C" fn future_cancel(_handle: RustFutureHandle) {
    bump(&CANCELS, 1);
}

unsafe extern "C" fn future_free(handle: RustFutureHandle) {
    bump(&LIVE_FUTURES, -1);
    drop(Arc::from_raw(handle.get() as usize as *const FakeFuture));
}

unsafe extern "C" fn complete_buffer(
    handle: RustFutureHandle,
    status: *mut RustCallStatus,
) -> RustBuffer {
    match take_outcome(handle) {
        Some(Outcome::Buffer(data)) => alloc(&data),
        Some(Outcome::Record(build)) => alloc(&build()),
        Some(Outcome::Error(message)) => {
            fail(status, &message);
            RustBuffer::empty()
        }
        _ => RustBuffer::empty(),
    }
}

unsafe extern "C" fn complete_pointer(
    handle: RustFutureHandle,
    status: *mut RustCallStatus,
) -> RawObject {
    match take_outcome(handle) {
        Some(Outcome::Object(value)) => new_object(value),
        Some(Outcome::Error(message)) => {
            fail(status, &message);
            RawObject::invalid()
        }
        _ => RawObject::invalid(),
    }
}

unsafe extern "C" fn complete_void(handle: RustFutureHandle, status: *mut RustCallStatus) {
    if let Some(Outcome::Error(message)) = take_outcome(handle) {
        fail(status, &message);
    }
}

fn future_abi<T>(complete: FutureCompleteFn<T>) -> FutureAbi<T> {
    FutureAbi {
        poll: future_poll,
        complete,
        cancel: future_cancel,
        free: future_free,
    }
}

// ---------------------------------------------------------------------------
// Helpers for domain values

pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}

/// 32-byte content address.
pub fn content_address(data: &[u8]) -> Vec<u8> {
    (0u64..4)
        .flat_map(|seed| {
            let mut hasher = DefaultHasher::new();
            seed.hash(&mut hasher);
            data.hash(&mut hasher);
            hasher.finish().to_be_bytes()
        })
        .collect()
}

static NETWORK: LazyLock<Mutex<HashMap<Vec<u8>, Vec<u8>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn store(data: &[u8]) -> Vec<u8> {
    let address = content_address(data);
    NETWORK.lock().insert(address.clone(), data.to_vec());
    address
}

fn fetch(address: &[u8]) -> Option<Vec<u8>> {
    NETWORK.lock().get(address).cloned()
}

/// Consume a payment argument. Returns whether a wallet paid.
unsafe fn take_payment(buf: RustBuffer) -> Result<bool, String> {
    let data = take(buf);
    if data.is_empty() {
        return Ok(false);
    }
    if data.len() != 12 || data[..4] != [0, 0, 0, 1] {
        return Err("malformed payment option".to_string());
    }
    let mut token = [0u8; 8];
    token.copy_from_slice(&data[4..]);
    match take_object(RawObject::from_wire(u64::from_be_bytes(token))) {
        Some(wallet) if matches!(*wallet, Value::Wallet { .. }) => Ok(true),
        _ => Err("payment is not a wallet".to_string()),
    }
}

/// Consume an optional string argument: tag byte, then a framed string.
unsafe fn take_optional_string(buf: RustBuffer) -> Result<Option<String>, String> {
    let data = take(buf);
    match data.first() {
        Some(0) if data.len() == 1 => Ok(None),
        Some(1) if data.len() >= 5 => {
            let len = u32::from_be_bytes([data[1], data[2], data[3], data[4]]) as usize;
            if len != data.len() - 5 {
                return Err("malformed optional string".to_string());
            }
            Ok(Some(String::from_utf8_lossy(&data[5..]).into_owned()))
        }
        _ => Err("malformed optional string".to_string()),
    }
}

fn price(data_len: usize, paid: bool) -> String {
    if paid {
        format!("{}", data_len)
    } else {
        "0".to_string()
    }
}

fn record(fields: &[&[u8]]) -> Vec<u8> {
    fields.iter().flat_map(|field| framed(field)).collect()
}

// ---------------------------------------------------------------------------
// Self-encryption

const ENCRYPTED_MAGIC: &[u8] = b"SE1";

unsafe extern "C" fn encrypt(data: RustBuffer, status: *mut RustCallStatus) -> RustBuffer {
    match take_bytes(data) {
        Ok(plain) => {
            let mut out = ENCRYPTED_MAGIC.to_vec();
            out.extend(plain.iter().map(|b| b ^ 0x5a));
            alloc(&out)
        }
        Err(e) => {
            fail(status, &e);
            RustBuffer::empty()
        }
    }
}

// Takes the blob exactly as encrypt returned it, with no prefix.
unsafe extern "C" fn decrypt(data: RustBuffer, status: *mut RustCallStatus) -> RustBuffer {
    let blob = take(data);
    match blob.strip_prefix(ENCRYPTED_MAGIC) {
        Some(body) => {
            let plain: Vec<u8> = body.iter().map(|b| b ^ 0x5a).collect();
            alloc(&framed(&plain))
        }
        None => {
            fail(status, "invalid encrypted data");
            RustBuffer::empty()
        }
    }
}

// ---------------------------------------------------------------------------
// Chunks and addresses

unsafe extern "C" fn chunk_new(value: RustBuffer, status: *mut RustCallStatus) -> RawObject {
    match take_bytes(value) {
        Ok(data) if data == b"boom" => {
            fail(status, "boom");
            RawObject::invalid()
        }
        Ok(data) => new_object(Value::Chunk(data)),
        Err(e) => {
            fail(status, &e);
            RawObject::invalid()
        }
    }
}

unsafe fn chunk_data(ptr: RawObject) -> Vec<u8> {
    match take_object(ptr).as_deref() {
        Some(Value::Chunk(data)) => data.clone(),
        _ => Vec::new(),
    }
}

unsafe extern "C" fn chunk_value(ptr: RawObject, _status: *mut RustCallStatus) -> RustBuffer {
    alloc(&framed(&chunk_data(ptr)))
}

unsafe extern "C" fn chunk_address(ptr: RawObject, _status: *mut RustCallStatus) -> RawObject {
    new_object(Value::Address(content_address(&chunk_data(ptr))))
}

unsafe extern "C" fn chunk_network_address(
    ptr: RawObject,
    _status: *mut RustCallStatus,
) -> RustBuffer {
    let address = to_hex(&content_address(&chunk_data(ptr)));
    alloc(format!("NetworkAddress::ChunkAddress({})", address).as_bytes())
}

unsafe extern "C" fn chunk_size(ptr: RawObject, _status: *mut RustCallStatus) -> u64 {
    chunk_data(ptr).len() as u64
}

unsafe extern "C" fn chunk_is_too_big(ptr: RawObject, _status: *mut RustCallStatus) -> i8 {
    i8::from(chunk_data(ptr).len() as u64 > CHUNK_MAX_SIZE)
}

unsafe extern "C" fn chunk_max_size(_status: *mut RustCallStatus) -> u64 {
    CHUNK_MAX_SIZE
}

unsafe extern "C" fn chunk_max_raw_size(_status: *mut RustCallStatus) -> u64 {
    CHUNK_MAX_RAW_SIZE
}

unsafe fn address_bytes(ptr: RawObject) -> Vec<u8> {
    match take_object(ptr).as_deref() {
        Some(Value::Address(bytes)) => bytes.clone(),
        _ => Vec::new(),
    }
}

unsafe extern "C" fn address_new(bytes: RustBuffer, status: *mut RustCallStatus) -> RawObject {
    match take_bytes(bytes) {
        Ok(bytes) if bytes.len() == 32 => new_object(Value::Address(bytes)),
        Ok(bytes) => {
            fail(status, &format!("invalid address length: {}", bytes.len()));
            RawObject::invalid()
        }
        Err(e) => {
            fail(status, &e);
            RawObject::invalid()
        }
    }
}

unsafe extern "C" fn address_from_hex(hex: RustBuffer, status: *mut RustCallStatus) -> RawObject {
    match from_hex(&take_string(hex)) {
        Some(bytes) if bytes.len() == 32 => new_object(Value::Address(bytes)),
        _ => {
            fail(status, "invalid hex address");
            RawObject::invalid()
        }
    }
}

unsafe extern "C" fn address_to_hex(ptr: RawObject, _status: *mut RustCallStatus) -> RustBuffer {
    alloc(to_hex(&address_bytes(ptr)).as_bytes())
}

unsafe extern "C" fn address_to_bytes(ptr: RawObject, _status: *mut RustCallStatus) -> RustBuffer {
    alloc(&framed(&address_bytes(ptr)))
}

unsafe extern "C" fn address_from_content(
    data: RustBuffer,
    status: *mut RustCallStatus,
) -> RawObject {
    match take_bytes(data) {
        Ok(data) => new_object(Value::Address(content_address(&data))),
        Err(e) => {
            fail(status, &e);
            RawObject::invalid()
        }
    }
}

fn address_api() -> AddressApi {
    AddressApi {
        object: object_abi(),
        new: address_new,
        from_hex: address_from_hex,
        to_hex: address_to_hex,
        to_bytes: address_to_bytes,
    }
}

unsafe fn data_map_key(ptr: RawObject) -> Vec<u8> {
    match take_object(ptr).as_deref() {
        Some(Value::DataMap(key)) => key.clone(),
        _ => Vec::new(),
    }
}

unsafe extern "C" fn data_map_from_hex(hex: RustBuffer, status: *mut RustCallStatus) -> RawObject {
    match from_hex(&take_string(hex)) {
        Some(key) if !key.is_empty() => new_object(Value::DataMap(key)),
        _ => {
            fail(status, "invalid data map hex");
            RawObject::invalid()
        }
    }
}

unsafe extern "C" fn data_map_to_hex(ptr: RawObject, _status: *mut RustCallStatus) -> RustBuffer {
    alloc(to_hex(&data_map_key(ptr)).as_bytes())
}

unsafe extern "C" fn data_map_address(ptr: RawObject, _status: *mut RustCallStatus) -> RustBuffer {
    alloc(to_hex(&content_address(&data_map_key(ptr))).as_bytes())
}

// ---------------------------------------------------------------------------
// Network and wallet

unsafe extern "C" fn network_new(local: i8, _status: *mut RustCallStatus) -> RawObject {
    new_object(Value::Network {
        local: local != 0,
        rpc_url: String::new(),
    })
}

unsafe extern "C" fn network_custom(
    rpc_url: RustBuffer,
    payment_token_address: RustBuffer,
    data_payments_address: RustBuffer,
    royalties_pk_hex: RustBuffer,
    status: *mut RustCallStatus,
) -> RawObject {
    let rpc_url = take_string(rpc_url);
    let payment_token_address = take_string(payment_token_address);
    let data_payments_address = take_string(data_payments_address);
    let royalties = take_optional_string(royalties_pk_hex);

    if !rpc_url.starts_with("http") {
        fail(status, "invalid rpc url");
        return RawObject::invalid();
    }
    if payment_token_address.is_empty() || data_payments_address.is_empty() {
        fail(status, "missing contract address");
        return RawObject::invalid();
    }
    match royalties {
        Ok(_) => new_object(Value::Network {
            local: false,
            rpc_url,
        }),
        Err(e) => {
            fail(status, &e);
            RawObject::invalid()
        }
    }
}

unsafe extern "C" fn wallet_from_private_key(
    network: RawObject,
    private_key: RustBuffer,
    status: *mut RustCallStatus,
) -> RawObject {
    let network = take_object(network);
    let key = take_string(private_key);
    if !matches!(network.as_deref(), Some(Value::Network { .. })) {
        fail(status, "not a network");
        return RawObject::invalid();
    }
    if !key.starts_with("0x") || key.len() < 42 {
        fail(status, "invalid private key");
        return RawObject::invalid();
    }
    new_object(Value::Wallet { key })
}

unsafe extern "C" fn wallet_address(ptr: RawObject, _status: *mut RustCallStatus) -> RustBuffer {
    match take_object(ptr).as_deref() {
        Some(Value::Wallet { key }) => alloc(format!("0x{}", &key[key.len() - 40..]).as_bytes()),
        _ => RustBuffer::empty(),
    }
}

unsafe extern "C" fn wallet_balance_of_tokens(ptr: RawObject) -> RustFutureHandle {
    drop(take_object(ptr));
    new_future(Outcome::Buffer(b"1000".to_vec()))
}

// ---------------------------------------------------------------------------
// Client

unsafe extern "C" fn client_init() -> RustFutureHandle {
    new_future(Outcome::Object(Value::Client { local: false }))
}

unsafe extern "C" fn client_init_local() -> RustFutureHandle {
    new_future(Outcome::Object(Value::Client { local: true }))
}

unsafe fn upload(
    ptr: RawObject,
    data: RustBuffer,
    payment: RustBuffer,
) -> Result<(Vec<u8>, bool), String> {
    drop(take_object(ptr));
    let data = take_bytes(data);
    let paid = take_payment(payment)?;
    Ok((data?, paid))
}

unsafe extern "C" fn client_data_put_public(
    ptr: RawObject,
    data: RustBuffer,
    payment: RustBuffer,
) -> RustFutureHandle {
    new_future(match upload(ptr, data, payment) {
        Ok((data, paid)) => {
            let address = to_hex(&store(&data));
            Outcome::Buffer(record(&[price(data.len(), paid).as_bytes(), address.as_bytes()]))
        }
        Err(e) => Outcome::Error(e),
    })
}

unsafe extern "C" fn client_data_get_public(
    ptr: RawObject,
    address_hex: RustBuffer,
) -> RustFutureHandle {
    drop(take_object(ptr));
    let address_hex = take_string(address_hex);
    if address_hex == PENDING_ADDRESS {
        return new_future(Outcome::Pending);
    }
    new_future(match from_hex(&address_hex).and_then(|a| fetch(&a)) {
        Some(data) => Outcome::Buffer(framed(&data)),
        None => Outcome::Error("record not found".to_string()),
    })
}

unsafe extern "C" fn client_data_put(
    ptr: RawObject,
    data: RustBuffer,
    payment: RustBuffer,
) -> RustFutureHandle {
    new_future(match upload(ptr, data, payment) {
        Ok((data, paid)) => {
            let key = store(&data);
            let cost = price(data.len(), paid);
            Outcome::Record(Box::new(move || {
                let mut out = framed(cost.as_bytes());
                out.extend_from_slice(&new_object(Value::DataMap(key)).to_wire().to_be_bytes());
                out
            }))
        }
        Err(e) => Outcome::Error(e),
    })
}

unsafe extern "C" fn client_data_get(ptr: RawObject, data_map: RawObject) -> RustFutureHandle {
    drop(take_object(ptr));
    let key = data_map_key(data_map);
    new_future(match fetch(&key) {
        Some(data) => Outcome::Buffer(framed(&data)),
        None => Outcome::Error("record not found".to_string()),
    })
}

unsafe extern "C" fn client_data_cost(ptr: RawObject, data: RustBuffer) -> RustFutureHandle {
    drop(take_object(ptr));
    new_future(match take_bytes(data) {
        Ok(data) => Outcome::Buffer((data.len() * 10).to_string().into_bytes()),
        Err(e) => Outcome::Error(e),
    })
}

unsafe fn read_file(path: RustBuffer) -> Result<Vec<u8>, String> {
    let path = take_string(path);
    std::fs::read(&path).map_err(|e| format!("{}: {}", path, e))
}

unsafe extern "C" fn client_file_upload_public(
    ptr: RawObject,
    file_path: RustBuffer,
    payment: RustBuffer,
) -> RustFutureHandle {
    drop(take_object(ptr));
    let contents = read_file(file_path);
    let paid = take_payment(payment);
    new_future(match (contents, paid) {
        (Ok(contents), Ok(_)) => Outcome::Buffer(to_hex(&store(&contents)).into_bytes()),
        (Err(e), _) | (_, Err(e)) => Outcome::Error(e),
    })
}

unsafe extern "C" fn client_file_download_public(
    ptr: RawObject,
    address: RawObject,
    dest_path: RustBuffer,
) -> RustFutureHandle {
    drop(take_object(ptr));
    let address = address_bytes(address);
    let dest = take_string(dest_path);
    new_future(write_file(&address, &dest))
}

fn write_file(address: &[u8], dest: &str) -> Outcome {
    match fetch(address) {
        Some(data) => match std::fs::write(dest, data) {
            Ok(()) => Outcome::Unit,
            Err(e) => Outcome::Error(format!("{}: {}", dest, e)),
        },
        None => Outcome::Error("record not found".to_string()),
    }
}

unsafe extern "C" fn client_file_upload(
    ptr: RawObject,
    file_path: RustBuffer,
    payment: RustBuffer,
) -> RustFutureHandle {
    drop(take_object(ptr));
    let contents = read_file(file_path);
    let paid = take_payment(payment);
    new_future(match (contents, paid) {
        (Ok(contents), Ok(_)) => Outcome::Object(Value::DataMap(store(&contents))),
        (Err(e), _) | (_, Err(e)) => Outcome::Error(e),
    })
}

unsafe extern "C" fn client_file_download(
    ptr: RawObject,
    data_map: RawObject,
    dest_path: RustBuffer,
) -> RustFutureHandle {
    drop(take_object(ptr));
    let key = data_map_key(data_map);
    let dest = take_string(dest_path);
    new_future(write_file(&key, &dest))
}

unsafe extern "C" fn client_file_cost(ptr: RawObject, file_path: RustBuffer) -> RustFutureHandle {
    drop(take_object(ptr));
    new_future(match read_file(file_path) {
        Ok(contents) => Outcome::Buffer((contents.len() * 10).to_string().into_bytes()),
        Err(e) => Outcome::Error(e),
    })
}

unsafe extern "C" fn client_chunk_put(
    ptr: RawObject,
    data: RustBuffer,
    payment: RustBuffer,
) -> RustFutureHandle {
    new_future(match upload(ptr, data, payment) {
        Ok((data, _)) if data.len() as u64 > CHUNK_MAX_SIZE => {
            Outcome::Error("chunk too big".to_string())
        }
        Ok((data, _)) => Outcome::Object(Value::Address(store(&data))),
        Err(e) => Outcome::Error(e),
    })
}

unsafe extern "C" fn client_chunk_get(ptr: RawObject, address: RawObject) -> RustFutureHandle {
    drop(take_object(ptr));
    new_future(match fetch(&address_bytes(address)) {
        Some(data) => Outcome::Object(Value::Chunk(data)),
        None => Outcome::Error("chunk not found".to_string()),
    })
}

// ---------------------------------------------------------------------------

/// The full entry point table.
pub fn api() -> Api {
    Api {
        buffers: BufferAbi {
            from_bytes: rustbuffer_from_bytes,
            free: rustbuffer_free,
        },
        futures: FutureTable {
            pointer: future_abi(complete_pointer),
            rust_buffer: future_abi(complete_buffer),
            void: future_abi(complete_void),
        },
        self_encryption: SelfEncryptionApi { encrypt, decrypt },
        chunk: ChunkApi {
            object: object_abi(),
            new: chunk_new,
            value: chunk_value,
            address: chunk_address,
            network_address: chunk_network_address,
            size: chunk_size,
            is_too_big: chunk_is_too_big,
            max_size: chunk_max_size,
            max_raw_size: chunk_max_raw_size,
        },
        chunk_address: ChunkAddressApi {
            address: address_api(),
            from_content: address_from_content,
        },
        data_address: address_api(),
        data_map_chunk: DataMapChunkApi {
            object: object_abi(),
            from_hex: data_map_from_hex,
            to_hex: data_map_to_hex,
            address: data_map_address,
        },
        network: NetworkApi {
            object: object_abi(),
            new: network_new,
            custom: network_custom,
        },
        wallet: WalletApi {
            object: object_abi(),
            from_private_key: wallet_from_private_key,
            address: wallet_address,
            balance_of_tokens: wallet_balance_of_tokens,
        },
        client: ClientApi {
            object: object_abi(),
            init: client_init,
            init_local: client_init_local,
            data_put_public: client_data_put_public,
            data_get_public: client_data_get_public,
            data_put: client_data_put,
            data_get: client_data_get,
            data_cost: client_data_cost,
            file_upload_public: client_file_upload_public,
            file_download_public: client_file_download_public,
            file_upload: client_file_upload,
            file_download: client_file_download,
            file_cost: client_file_cost,
            chunk_put: client_chunk_put,
            chunk_get: client_chunk_get,
        },
    }
}
