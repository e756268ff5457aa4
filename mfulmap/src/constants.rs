// mfulmap-rs/mfulmap/src/constants.rs
//! Common protocol constants used across the crate

/// Size of one Mifare Ultralight block in bytes (write granularity)
pub const BLOCK_SIZE: usize = 4;

/// Bytes returned by one READ command (four consecutive blocks)
pub const READ_RESPONSE_LEN: usize = 16;

/// Number of blocks addressable inside one sector (one address byte)
pub const SECTOR_BLOCKS: usize = 256;

/// Bytes covered by one sector
pub const SECTOR_SIZE: usize = SECTOR_BLOCKS * BLOCK_SIZE;

/// Block holding the static lock bytes (bytes 2 and 3)
pub const LOCK_BLOCK: u8 = 2;

/// Block holding the Capability Container
pub const CC_BLOCK: u8 = 3;

/// First block of the TLV area
pub const FIRST_DATA_BLOCK: u8 = 4;

/// Absolute byte address of the first TLV byte (block 4)
pub const DATA_AREA_START: usize = FIRST_DATA_BLOCK as usize * BLOCK_SIZE;

/// Capacity of the read staging buffer
pub const READ_BUFFER_SIZE: usize = 64;

/// Capacity of an outgoing command buffer
pub const SEND_BUFFER_SIZE: usize = 16;

/// NULL TLV (padding)
pub const TLV_NULL: u8 = 0x00;
/// Lock Control TLV
pub const TLV_LOCK_CONTROL: u8 = 0x01;
/// Memory Control TLV
pub const TLV_MEMORY_CONTROL: u8 = 0x02;
/// NDEF Message TLV
pub const TLV_NDEF: u8 = 0x03;
/// Proprietary TLV
pub const TLV_PROPRIETARY: u8 = 0xFD;
/// Terminator TLV
pub const TLV_TERMINATOR: u8 = 0xFE;

/// Length byte announcing the 3-byte length form
pub const TLV_LONG_LENGTH_MARKER: u8 = 0xFF;

/// Largest length encodable in the 1-byte form
pub const TLV_SHORT_LENGTH_MAX: usize = 0xFE;

/// Largest length encodable in the 3-byte form
pub const TLV_LONG_LENGTH_MAX: usize = 0xFFFE;

/// CC byte 0: NDEF magic number
pub const CC_MAGIC: u8 = 0xE1;

/// CC byte 3: read/write access granted
pub const CC_ACCESS_READ_WRITE: u8 = 0x00;

/// CC byte 3: read-only access
pub const CC_ACCESS_READ_ONLY: u8 = 0x0F;

/// Supported major mapping version
pub const MAPPING_MAJOR_VERSION: u8 = 1;

/// Memory sizes above this value lose two reserved bytes
pub const RESERVED_SIZE_THRESHOLD: usize = 256;

/// Reserved bytes subtracted from large memory sizes
pub const RESERVED_BYTES: usize = 2;

/// Lock byte 2 values above this mark static blocks as locked
pub const LOCK_BYTE2_MAX_UNLOCKED: u8 = 0x0F;

/// Positive 4-bit acknowledgement returned by the tag
pub const ACK: u8 = 0x0A;

/// SECTOR_SELECT packet 1 command bytes
pub const SECTOR_SELECT_CMD: [u8; 2] = [0xC2, 0xFF];

/// Raw command header preceding sector select packets
pub const RAW_HEADER: [u8; 2] = [0x00, 0x00];

/// ATQA byte 0 bits identifying a Mifare Ultralight
pub const ULTRALIGHT_ATQA_MASK: u8 = 0x44;

/// CRC-A register preset (ISO/IEC 14443-3 Type A)
pub const CRC_A_PRESET: u16 = 0x6363;

/// CRC-B register preset (ISO/IEC 14443-3 Type B)
pub const CRC_B_PRESET: u16 = 0xFFFF;
