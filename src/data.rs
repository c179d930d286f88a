//! Chunks, addresses and data maps.

use crate::error::Result;
use crate::library::Library;

/// Maximum size of a chunk after encryption, in bytes.
pub fn chunk_max_size(lib: &Library) -> Result<u64> {
    let api = lib.api();
    lib.call("chunk_max_size", |status| unsafe { (api.chunk.max_size)(status) })
}

/// Maximum size of the raw content of a chunk, in bytes.
pub fn chunk_max_raw_size(lib: &Library) -> Result<u64> {
    let api = lib.api();
    lib.call("chunk_max_raw_size", |status| unsafe {
        (api.chunk.max_raw_size)(status)
    })
}

native_object!(
    /// A content-addressed chunk of data.
    Chunk,
    chunk.object
);

impl Chunk {
    /// Create a chunk holding `data`.
    pub fn new(lib: &Library, data: &[u8]) -> Result<Self> {
        let api = lib.api();
        let value = api.buffers.encode_bytes(data)?;
        let token = lib.call("Chunk.new", |status| unsafe {
            (api.chunk.new)(value.into_raw(), status)
        })?;
        Ok(Self::from_token(lib, token))
    }

    /// The chunk's content.
    pub fn value(&self) -> Result<Vec<u8>> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let buf = self.lib.call("Chunk.value", |status| unsafe {
            (api.chunk.value)(this.into_raw(), status)
        })?;
        Ok(api.buffers.decode_bytes(buf, true))
    }

    /// The chunk's address.
    pub fn address(&self) -> Result<ChunkAddress> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let token = self.lib.call("Chunk.address", |status| unsafe {
            (api.chunk.address)(this.into_raw(), status)
        })?;
        Ok(ChunkAddress::from_token(&self.lib, token))
    }

    /// The chunk's address in the network's key space, as a string.
    pub fn network_address(&self) -> Result<String> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let buf = self.lib.call("Chunk.network_address", |status| unsafe {
            (api.chunk.network_address)(this.into_raw(), status)
        })?;
        Ok(api.buffers.decode_string(buf))
    }

    /// Size of the chunk's content in bytes.
    pub fn size(&self) -> Result<u64> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        self.lib.call("Chunk.size", |status| unsafe {
            (api.chunk.size)(this.into_raw(), status)
        })
    }

    /// Check if the chunk exceeds the maximum chunk size.
    pub fn is_too_big(&self) -> Result<bool> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let flag = self.lib.call("Chunk.is_too_big", |status| unsafe {
            (api.chunk.is_too_big)(this.into_raw(), status)
        })?;
        Ok(flag != 0)
    }
}

/// Constructors and accessors shared by address types.
macro_rules! address_methods {
    ($name:ident, $($api:ident).+) => {
        impl $name {
            /// Create an address from its raw bytes.
            pub fn new(lib: &Library, bytes: &[u8]) -> Result<Self> {
                let api = lib.api();
                let bytes = api.buffers.encode_bytes(bytes)?;
                let token = lib.call(concat!(stringify!($name), ".new"), |status| unsafe {
                    (api.$($api).+.new)(bytes.into_raw(), status)
                })?;
                Ok(Self::from_token(lib, token))
            }

            /// Parse an address from hex.
            pub fn from_hex(lib: &Library, hex: &str) -> Result<Self> {
                let api = lib.api();
                let hex = api.buffers.encode_string(hex)?;
                let token = lib.call(concat!(stringify!($name), ".from_hex"), |status| unsafe {
                    (api.$($api).+.from_hex)(hex.into_raw(), status)
                })?;
                Ok(Self::from_token(lib, token))
            }

            /// Hex form of the address.
            pub fn to_hex(&self) -> Result<String> {
                let api = self.lib.api();
                let this = self.handle.use_token()?;
                let buf = self.lib.call(concat!(stringify!($name), ".to_hex"), |status| unsafe {
                    (api.$($api).+.to_hex)(this.into_raw(), status)
                })?;
                Ok(api.buffers.decode_string(buf))
            }

            /// Raw bytes of the address.
            pub fn to_bytes(&self) -> Result<Vec<u8>> {
                let api = self.lib.api();
                let this = self.handle.use_token()?;
                let buf = self.lib.call(concat!(stringify!($name), ".to_bytes"), |status| unsafe {
                    (api.$($api).+.to_bytes)(this.into_raw(), status)
                })?;
                Ok(api.buffers.decode_bytes(buf, true))
            }
        }
    };
}

native_object!(
    /// Address of a single chunk.
    ChunkAddress,
    chunk_address.address.object
);

address_methods!(ChunkAddress, chunk_address.address);

impl ChunkAddress {
    /// Address the chunk holding `data` would be stored at.
    pub fn from_content(lib: &Library, data: &[u8]) -> Result<Self> {
        let api = lib.api();
        let data = api.buffers.encode_bytes(data)?;
        let token = lib.call("ChunkAddress.from_content", |status| unsafe {
            (api.chunk_address.from_content)(data.into_raw(), status)
        })?;
        Ok(Self::from_token(lib, token))
    }
}

native_object!(
    /// Address of publicly stored data.
    DataAddress,
    data_address.object
);

address_methods!(DataAddress, data_address);

native_object!(
    /// Data map of privately stored data; needed to fetch it back.
    DataMapChunk,
    data_map_chunk.object
);

impl DataMapChunk {
    /// Parse a data map from hex.
    pub fn from_hex(lib: &Library, hex: &str) -> Result<Self> {
        let api = lib.api();
        let hex = api.buffers.encode_string(hex)?;
        let token = lib.call("DataMapChunk.from_hex", |status| unsafe {
            (api.data_map_chunk.from_hex)(hex.into_raw(), status)
        })?;
        Ok(Self::from_token(lib, token))
    }

    /// Hex form of the data map.
    pub fn to_hex(&self) -> Result<String> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let buf = self.lib.call("DataMapChunk.to_hex", |status| unsafe {
            (api.data_map_chunk.to_hex)(this.into_raw(), status)
        })?;
        Ok(api.buffers.decode_string(buf))
    }

    /// Hex address of the data map chunk.
    pub fn address(&self) -> Result<String> {
        let api = self.lib.api();
        let this = self.handle.use_token()?;
        let buf = self.lib.call("DataMapChunk.address", |status| unsafe {
            (api.data_map_chunk.address)(this.into_raw(), status)
        })?;
        Ok(api.buffers.decode_string(buf))
    }
}
