//! Network client for storing and fetching data.

use std::path::Path;

use crate::cancel::CancelToken;
use crate::codec::{OwnedBuffer, WireReader};
use crate::data::{Chunk, ChunkAddress, DataAddress, DataMapChunk};
use crate::error::{Error, Result};
use crate::library::Library;
use crate::types::{lower_payment, DataPutResult, PaymentOption, UploadResult};

native_object!(
    /// A connection to the Autonomi network.
    ///
    /// Every network operation blocks the calling thread until the native
    /// future completes, the optional [`CancelToken`] fires, or the
    /// library's default timeout passes.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ant::{Client, Library};
    ///
    /// let lib = Library::from_env()?;
    /// let client = Client::init_local(&lib, None)?;
    /// let result = client.data_put_public(b"hello", None, None)?;
    /// let data = client.data_get_public(&result.address, None)?;
    /// assert_eq!(data, b"hello");
    /// # Ok::<(), ant::Error>(())
    /// ```
    Client,
    client.object
);

impl Client {
    /// Connect to the public network.
    pub fn init(lib: &Library, cancel: Option<&CancelToken>) -> Result<Self> {
        let api = lib.api();
        let future = unsafe { (api.client.init)() };
        lib.wait("Client.init", future, api.futures.pointer, cancel, |token| {
            Ok(Self::from_token(lib, token))
        })
    }

    /// Connect to a local testnet.
    pub fn init_local(lib: &Library, cancel: Option<&CancelToken>) -> Result<Self> {
        let api = lib.api();
        let future = unsafe { (api.client.init_local)() };
        lib.wait("Client.init_local", future, api.futures.pointer, cancel, |token| {
            Ok(Self::from_token(lib, token))
        })
    }

    /// Upload public data.
    ///
    /// # Arguments
    ///
    /// * `data` - Bytes to store
    /// * `payment` - Wallet to pay with, or `None`
    /// * `cancel` - Optional cancellation token
    ///
    /// # Returns
    ///
    /// The price paid and the hex address to fetch the data from.
    pub fn data_put_public(
        &self,
        data: &[u8],
        payment: Option<PaymentOption<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<UploadResult> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let data = api.buffers.encode_bytes(data)?;
        let payment = lower_payment(&api.buffers, payment)?;

        let future = unsafe {
            (api.client.data_put_public)(this.into_raw(), data.into_raw(), payment.into_raw())
        };
        self.lib.wait(
            "Client.data_put_public",
            future,
            api.futures.rust_buffer,
            cancel,
            |buf| {
                let record = api.buffers.decode_raw(buf, true);
                let mut reader = WireReader::new(&record);
                let price = reader.read_string();
                let address = reader.read_string();
                Ok(UploadResult { price, address })
            },
        )
    }

    /// Fetch public data by its hex address.
    pub fn data_get_public(&self, address_hex: &str, cancel: Option<&CancelToken>) -> Result<Vec<u8>> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let address = api.buffers.encode_string(address_hex)?;

        let future = unsafe { (api.client.data_get_public)(this.into_raw(), address.into_raw()) };
        self.lib.wait(
            "Client.data_get_public",
            future,
            api.futures.rust_buffer,
            cancel,
            |buf| Ok(api.buffers.decode_bytes(buf, true)),
        )
    }

    /// Upload private, self-encrypted data.
    ///
    /// The returned [`DataMapChunk`] is the only way to fetch the data back.
    pub fn data_put(
        &self,
        data: &[u8],
        payment: Option<PaymentOption<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<DataPutResult> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let data = api.buffers.encode_bytes(data)?;
        let payment = lower_payment(&api.buffers, payment)?;

        let future =
            unsafe { (api.client.data_put)(this.into_raw(), data.into_raw(), payment.into_raw()) };
        self.lib.wait("Client.data_put", future, api.futures.rust_buffer, cancel, |buf| {
            let record = api.buffers.decode_raw(buf, true);
            let mut reader = WireReader::new(&record);
            let cost = reader.read_string();
            let data_map = DataMapChunk::from_token(&self.lib, reader.read_pointer());
            Ok(DataPutResult { cost, data_map })
        })
    }

    /// Fetch private data through its data map.
    pub fn data_get(&self, data_map: &DataMapChunk, cancel: Option<&CancelToken>) -> Result<Vec<u8>> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let data_map = data_map.handle().use_token()?;

        let future = unsafe { (api.client.data_get)(this.into_raw(), data_map.into_raw()) };
        self.lib.wait(
            "Client.data_get",
            future,
            api.futures.rust_buffer,
            cancel,
            |buf| Ok(api.buffers.decode_bytes(buf, true)),
        )
    }

    /// Estimate the cost of storing `data`.
    pub fn data_cost(&self, data: &[u8], cancel: Option<&CancelToken>) -> Result<String> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let data = api.buffers.encode_bytes(data)?;

        let future = unsafe { (api.client.data_cost)(this.into_raw(), data.into_raw()) };
        self.lib.wait(
            "Client.data_cost",
            future,
            api.futures.rust_buffer,
            cancel,
            |buf| Ok(api.buffers.decode_string(buf)),
        )
    }

    /// Upload a public file. Returns the hex address of the stored file.
    pub fn file_upload_public(
        &self,
        path: impl AsRef<Path>,
        payment: Option<PaymentOption<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<String> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let path = encode_path(&self.lib, path.as_ref())?;
        let payment = lower_payment(&api.buffers, payment)?;

        let future = unsafe {
            (api.client.file_upload_public)(this.into_raw(), path.into_raw(), payment.into_raw())
        };
        self.lib.wait(
            "Client.file_upload_public",
            future,
            api.futures.rust_buffer,
            cancel,
            |buf| Ok(api.buffers.decode_string(buf)),
        )
    }

    /// Download a public file to `dest`.
    pub fn file_download_public(
        &self,
        address: &DataAddress,
        dest: impl AsRef<Path>,
        cancel: Option<&CancelToken>,
    ) -> Result<()> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let address = address.handle().use_token()?;
        let dest = encode_path(&self.lib, dest.as_ref())?;

        let future = unsafe {
            (api.client.file_download_public)(this.into_raw(), address.into_raw(), dest.into_raw())
        };
        self.lib
            .wait("Client.file_download_public", future, api.futures.void, cancel, |()| Ok(()))
    }

    /// Upload a private file. Returns the data map needed to fetch it.
    pub fn file_upload(
        &self,
        path: impl AsRef<Path>,
        payment: Option<PaymentOption<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<DataMapChunk> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let path = encode_path(&self.lib, path.as_ref())?;
        let payment = lower_payment(&api.buffers, payment)?;

        let future = unsafe {
            (api.client.file_upload)(this.into_raw(), path.into_raw(), payment.into_raw())
        };
        self.lib.wait("Client.file_upload", future, api.futures.pointer, cancel, |token| {
            Ok(DataMapChunk::from_token(&self.lib, token))
        })
    }

    /// Download a private file to `dest`.
    pub fn file_download(
        &self,
        data_map: &DataMapChunk,
        dest: impl AsRef<Path>,
        cancel: Option<&CancelToken>,
    ) -> Result<()> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let data_map = data_map.handle().use_token()?;
        let dest = encode_path(&self.lib, dest.as_ref())?;

        let future = unsafe {
            (api.client.file_download)(this.into_raw(), data_map.into_raw(), dest.into_raw())
        };
        self.lib
            .wait("Client.file_download", future, api.futures.void, cancel, |()| Ok(()))
    }

    /// Estimate the cost of storing the file at `path`.
    pub fn file_cost(&self, path: impl AsRef<Path>, cancel: Option<&CancelToken>) -> Result<String> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let path = encode_path(&self.lib, path.as_ref())?;

        let future = unsafe { (api.client.file_cost)(this.into_raw(), path.into_raw()) };
        self.lib.wait(
            "Client.file_cost",
            future,
            api.futures.rust_buffer,
            cancel,
            |buf| Ok(api.buffers.decode_string(buf)),
        )
    }

    /// Store a single chunk. Returns its address.
    pub fn chunk_put(
        &self,
        data: &[u8],
        payment: Option<PaymentOption<'_>>,
        cancel: Option<&CancelToken>,
    ) -> Result<ChunkAddress> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let data = api.buffers.encode_bytes(data)?;
        let payment = lower_payment(&api.buffers, payment)?;

        let future =
            unsafe { (api.client.chunk_put)(this.into_raw(), data.into_raw(), payment.into_raw()) };
        self.lib.wait("Client.chunk_put", future, api.futures.pointer, cancel, |token| {
            Ok(ChunkAddress::from_token(&self.lib, token))
        })
    }

    /// Fetch a single chunk by address.
    pub fn chunk_get(&self, address: &ChunkAddress, cancel: Option<&CancelToken>) -> Result<Chunk> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let address = address.handle().use_token()?;

        let future = unsafe { (api.client.chunk_get)(this.into_raw(), address.into_raw()) };
        self.lib.wait("Client.chunk_get", future, api.futures.pointer, cancel, |token| {
            Ok(Chunk::from_token(&self.lib, token))
        })
    }
}

/// Encode a filesystem path as a native string.
fn encode_path(lib: &Library, path: &Path) -> Result<OwnedBuffer> {
    let path = path
        .to_str()
        .ok_or_else(|| Error::InvalidArgument(format!("path is not valid UTF-8: {}", path.display())))?;
    lib.buffers().encode_string(path)
}
