//! Memory subsystem: flat byte-addressable storage with bounds and
//! alignment checking.
//!
//! The truncation warnings are allowed because this is a 32-bit machine
//! whose memory size is bounded at construction time.

#![allow(clippy::cast_possible_truncation)]

use crate::error::{AccessType, TrapCause, VmResult};

/// Default size of the simulated address space, in bytes.
pub const DEFAULT_MEMORY_SIZE: u32 = 1 << 20;

/// Transfer width for a memory access.
///
/// Selects both the number of bytes moved and the address modulus required
/// when alignment checking is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// 8-bit transfer, no alignment constraint.
    Byte,
    /// 16-bit transfer, address must be even when alignment is enforced.
    Half,
    /// 32-bit transfer, address must be a multiple of 4 when enforced.
    Word,
}

impl Width {
    /// Number of bytes moved by an access of this width.
    #[must_use]
    pub fn bytes(self) -> u32 {
        match self {
            Width::Byte => 1,
            Width::Half => 2,
            Width::Word => 4,
        }
    }
}

/// Flat little-endian memory for one simulated machine.
///
/// Addresses run from 0 to the size chosen at construction. Any access
/// touching a byte at or beyond the bound faults, and a faulting transfer
/// never writes anything.
#[derive(Debug, Clone)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Create a zero-initialized memory of the given size in bytes.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Memory {
            data: vec![0u8; size as usize],
        }
    }

    /// Size of the address space in bytes.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    /// Validate an access and return the starting offset into the backing
    /// buffer. Every byte of the transfer must lie inside the bound, and
    /// when `check_align` is set the address must satisfy the width's
    /// modulus (bytes are always aligned).
    #[inline]
    fn check(
        &self,
        addr: u32,
        width: Width,
        access: AccessType,
        check_align: bool,
    ) -> VmResult<usize> {
        let len = width.bytes();
        let end = addr.saturating_add(len);

        if end > self.data.len() as u32 {
            return Err(TrapCause::MemoryFault { addr, access });
        }
        if check_align && addr % len != 0 {
            return Err(TrapCause::MemoryFault { addr, access });
        }

        Ok(addr as usize)
    }

    /// Load 1, 2, or 4 bytes starting at `addr` and assemble them
    /// little-endian into an unsigned 32-bit value.
    ///
    /// Sign extension for signed sub-word loads is the caller's business;
    /// this primitive always zero-extends.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] (tagged as a read) if the access
    /// is out of bounds or fails a requested alignment check.
    #[inline]
    pub fn load(&self, addr: u32, width: Width, check_align: bool) -> VmResult<u32> {
        let offset = self.check(addr, width, AccessType::Read, check_align)?;
        let value = match width {
            Width::Byte => u32::from(self.data[offset]),
            Width::Half => {
                u32::from(u16::from_le_bytes([self.data[offset], self.data[offset + 1]]))
            }
            Width::Word => {
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(&self.data[offset..offset + 4]);
                u32::from_le_bytes(bytes)
            }
        };
        Ok(value)
    }

    /// Store the low 1, 2, or 4 bytes of `value` little-endian starting at
    /// `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] (tagged as a write) if the access
    /// is out of bounds or fails a requested alignment check. Nothing is
    /// written on a fault.
    #[inline]
    pub fn store(&mut self, addr: u32, width: Width, value: u32, check_align: bool) -> VmResult<()> {
        let offset = self.check(addr, width, AccessType::Write, check_align)?;
        match width {
            Width::Byte => self.data[offset] = value as u8,
            Width::Half => {
                self.data[offset..offset + 2].copy_from_slice(&(value as u16).to_le_bytes());
            }
            Width::Word => {
                self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
            }
        }
        Ok(())
    }

    /// Load a byte without alignment enforcement.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the address is out of bounds.
    #[inline]
    pub fn load_u8(&self, addr: u32) -> VmResult<u8> {
        self.load(addr, Width::Byte, false).map(|v| v as u8)
    }

    /// Load a halfword without alignment enforcement, little-endian.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the access is out of bounds.
    #[inline]
    pub fn load_u16(&self, addr: u32) -> VmResult<u16> {
        self.load(addr, Width::Half, false).map(|v| v as u16)
    }

    /// Load a word without alignment enforcement, little-endian.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the access is out of bounds.
    #[inline]
    pub fn load_u32(&self, addr: u32) -> VmResult<u32> {
        self.load(addr, Width::Word, false)
    }

    /// Store a byte.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the address is out of bounds.
    #[inline]
    pub fn store_u8(&mut self, addr: u32, value: u8) -> VmResult<()> {
        self.store(addr, Width::Byte, u32::from(value), false)
    }

    /// Store a halfword, little-endian.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the access is out of bounds.
    #[inline]
    pub fn store_u16(&mut self, addr: u32, value: u16) -> VmResult<()> {
        self.store(addr, Width::Half, u32::from(value), false)
    }

    /// Store a word, little-endian.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the access is out of bounds.
    #[inline]
    pub fn store_u32(&mut self, addr: u32, value: u32) -> VmResult<()> {
        self.store(addr, Width::Word, value, false)
    }

    /// Fetch an instruction word.
    ///
    /// Identical to [`Memory::load_u32`] except the fault is tagged
    /// [`AccessType::Execute`], distinguishing fetch faults from data loads.
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the access is out of bounds.
    #[inline]
    pub fn fetch(&self, addr: u32) -> VmResult<u32> {
        let offset = self.check(addr, Width::Word, AccessType::Execute, false)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[offset..offset + 4]);
        Ok(u32::from_le_bytes(bytes))
    }

    /// Borrow a range of bytes (for string syscalls and reporting).
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the range is out of bounds.
    #[inline]
    pub fn load_bytes(&self, addr: u32, len: u32) -> VmResult<&[u8]> {
        let end = addr.saturating_add(len);
        if end > self.data.len() as u32 {
            return Err(TrapCause::MemoryFault {
                addr,
                access: AccessType::Read,
            });
        }
        Ok(&self.data[addr as usize..end as usize])
    }

    /// Copy a byte slice into memory (for program images).
    ///
    /// # Errors
    ///
    /// Returns [`TrapCause::MemoryFault`] if the range is out of bounds.
    /// Nothing is written on a fault.
    #[inline]
    pub fn store_bytes(&mut self, addr: u32, bytes: &[u8]) -> VmResult<()> {
        let len = bytes.len() as u32;
        let end = addr.saturating_add(len);
        if bytes.len() > self.data.len() || end > self.data.len() as u32 {
            return Err(TrapCause::MemoryFault {
                addr,
                access: AccessType::Write,
            });
        }
        self.data[addr as usize..end as usize].copy_from_slice(bytes);
        Ok(())
    }
}
