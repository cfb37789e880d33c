// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Mailbox register block of the Sensor Fusion Hub
//!
//! The coprocessor exposes a single command mailbox shared by every sensor. The host writes
//! command-to-processor (C2P) registers; the firmware answers through processor-to-command
//! (P2C) registers.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Driver (sfh-driver Mailbox)                  │
//! └─────────────────┬────────────────────────────┘
//!                   │ uses
//! ┌─────────────────▼────────────────────────────┐
//! │ RegisterBlock trait (THIS FILE)              │
//! │ - read32() / write32() / write64()           │
//! │ - write_barrier()                            │
//! └─────────────────┬────────────────────────────┘
//!                   │ implements
//! ┌─────────────────▼────────────────────────────┐
//! │ MmioRegisters       (mapped BAR, volatile)   │
//! │ RecordingRegisters  (host register file)     │
//! └──────────────────────────────────────────────┘
//! ```

/// Byte offsets of the mailbox registers from the start of the mapped window.
pub mod offsets {
    /// Command word.
    pub const C2P_MSG0: usize = 0x10500;
    /// Parameter word.
    pub const C2P_MSG1: usize = 0x10504;
    /// DMA target address, low half of the 64-bit write.
    pub const C2P_MSG2: usize = 0x10508;
    /// DMA target address, high half.
    pub const C2P_MSG3: usize = 0x1050C;
    pub const C2P_MSG4: usize = 0x10510;
    pub const C2P_MSG5: usize = 0x10514;
    pub const C2P_MSG6: usize = 0x10518;
    pub const C2P_MSG7: usize = 0x1051C;
    pub const C2P_MSG8: usize = 0x10520;
    pub const C2P_MSG9: usize = 0x10524;

    /// Response words.
    pub const P2C_MSG0: usize = 0x10680;
    pub const P2C_MSG1: usize = 0x10684;
    pub const P2C_MSG2: usize = 0x10688;
    /// Version in the low 4 bits, capability mask above it.
    pub const P2C_MSG3: usize = 0x1068C;
    pub const P2C_INTEN: usize = 0x10690;
    pub const P2C_INTSTS: usize = 0x10694;

    /// Every command-side register, in address order.
    pub const C2P_ALL: [usize; 10] = [
        C2P_MSG0, C2P_MSG1, C2P_MSG2, C2P_MSG3, C2P_MSG4, C2P_MSG5, C2P_MSG6, C2P_MSG7, C2P_MSG8,
        C2P_MSG9,
    ];

    /// Response words cleared at teardown.
    pub const P2C_RESPONSE: [usize; 3] = [P2C_MSG0, P2C_MSG1, P2C_MSG2];
}

/// Minimum length of a mapped window that covers every mailbox register.
pub const REGISTER_WINDOW_LEN: usize = offsets::P2C_INTSTS + 4;

/// 32-bit register access to the mailbox window.
///
/// Offsets are byte offsets from [`offsets`]. Writes must reach the device in program order;
/// implementations whose stores can be reordered provide [`RegisterBlock::write_barrier`].
pub trait RegisterBlock: Send {
    /// Read a 32-bit register.
    fn read32(&self, offset: usize) -> u32;

    /// Write a 32-bit register.
    fn write32(&mut self, offset: usize, value: u32);

    /// Write a 64-bit value as two 32-bit stores, low half first.
    ///
    /// The device latches the pair only when the command word is written, so non-atomic
    /// 64-bit stores are sufficient.
    fn write64(&mut self, offset: usize, value: u64) {
        self.write32(offset, value as u32);
        self.write32(offset + 4, (value >> 32) as u32);
    }

    /// Order every previous write before any following write.
    fn write_barrier(&mut self) {}
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for Box<T> {
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&mut self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }

    fn write64(&mut self, offset: usize, value: u64) {
        (**self).write64(offset, value)
    }

    fn write_barrier(&mut self) {
        (**self).write_barrier()
    }
}
