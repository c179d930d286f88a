//! EVM network configuration and wallets.

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::handle::Handle;
use crate::library::Library;

/// EVM network the client pays on.
pub struct Network {
    handle: Handle,
    lib: Library,
    is_local: bool,
}

impl Network {
    /// The public network, or a local testnet if `is_local` is set.
    pub fn new(lib: &Library, is_local: bool) -> Result<Self> {
        let api = lib.api();
        let token = lib.call("Network.new", |status| unsafe {
            (api.network.new)(i8::from(is_local), status)
        })?;
        Ok(Self::from_token(lib, token, is_local))
    }

    /// A custom network given its RPC endpoint and contract addresses.
    pub fn custom(
        lib: &Library,
        rpc_url: &str,
        payment_token_address: &str,
        data_payments_address: &str,
        royalties_pk_hex: Option<&str>,
    ) -> Result<Self> {
        let api = lib.api();
        let rpc_url = api.buffers.encode_string(rpc_url)?;
        let payment_token_address = api.buffers.encode_string(payment_token_address)?;
        let data_payments_address = api.buffers.encode_string(data_payments_address)?;
        let royalties_pk_hex = api.buffers.encode_optional_string(royalties_pk_hex)?;

        let token = lib.call("Network.custom", |status| unsafe {
            (api.network.custom)(
                rpc_url.into_raw(),
                payment_token_address.into_raw(),
                data_payments_address.into_raw(),
                royalties_pk_hex.into_raw(),
                status,
            )
        })?;
        Ok(Self::from_token(lib, token, false))
    }

    fn from_token(lib: &Library, token: crate::ffi::RawObject, is_local: bool) -> Self {
        Self {
            handle: lib.wrap("Network", token, lib.api().network.object),
            lib: lib.clone(),
            is_local,
        }
    }

    /// Check if this is a local testnet.
    pub fn is_local(&self) -> bool {
        self.is_local
    }

    /// Release the native object. Safe to call more than once; also runs
    /// on drop.
    pub fn release(&self) {
        self.handle.release();
    }

    /// Check if the object has been released.
    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("is_local", &self.is_local)
            .field("released", &self.is_released())
            .finish()
    }
}

native_object!(
    /// An EVM wallet used to pay for uploads.
    Wallet,
    wallet.object
);

impl Wallet {
    /// Create a wallet on `network` from a hex private key.
    pub fn from_private_key(network: &Network, private_key: &str) -> Result<Self> {
        let lib = &network.lib;
        let api = lib.api();
        let network = network.handle.use_token()?;
        let private_key = api.buffers.encode_string(private_key)?;

        let token = lib.call("Wallet.from_private_key", |status| unsafe {
            (api.wallet.from_private_key)(network.into_raw(), private_key.into_raw(), status)
        })?;
        Ok(Self::from_token(lib, token))
    }

    /// The wallet's address.
    pub fn address(&self) -> Result<String> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let buf = self.lib.call("Wallet.address", |status| unsafe {
            (api.wallet.address)(this.into_raw(), status)
        })?;
        Ok(api.buffers.decode_string(buf))
    }

    /// Token balance, as a decimal string.
    pub fn balance_of_tokens(&self, cancel: Option<&CancelToken>) -> Result<String> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let future = unsafe { (api.wallet.balance_of_tokens)(this.into_raw()) };
        self.lib.wait(
            "Wallet.balance_of_tokens",
            future,
            api.futures.rust_buffer,
            cancel,
            |buf| Ok(api.buffers.decode_string(buf)),
        )
    }
}
