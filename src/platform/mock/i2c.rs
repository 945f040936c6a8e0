//! Mock I2C implementation for testing

use core::cell::RefCell;
use std::collections::VecDeque;
use std::vec::Vec;

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::{I2cConfig, I2cInterface},
    Result,
};

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    /// Write transaction
    Write { addr: u8, data: Vec<u8> },
    /// Read transaction
    Read { addr: u8, len: usize },
    /// Write-Read transaction
    WriteRead {
        addr: u8,
        write_data: Vec<u8>,
        read_len: usize,
    },
}

/// Mock I2C implementation
///
/// Records all transactions and answers reads from a queue of canned
/// responses. Each read consumes one response; bytes past its end read as
/// zero, and an empty queue reads as all zeros (an idle SHTP hub).
#[derive(Debug)]
pub struct MockI2c {
    config: I2cConfig,
    transactions: RefCell<Vec<I2cTransaction>>,
    responses: RefCell<VecDeque<Vec<u8>>>,
    failures: RefCell<VecDeque<I2cError>>,
}

impl MockI2c {
    pub fn new(config: I2cConfig) -> Self {
        Self {
            config,
            transactions: RefCell::new(Vec::new()),
            responses: RefCell::new(VecDeque::new()),
            failures: RefCell::new(VecDeque::new()),
        }
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> Vec<I2cTransaction> {
        self.transactions.borrow().clone()
    }

    /// Clear transaction log
    pub fn clear_transactions(&mut self) {
        self.transactions.borrow_mut().clear();
    }

    /// Queue the bytes returned by one future read
    pub fn queue_read(&mut self, data: &[u8]) {
        self.responses.borrow_mut().push_back(data.to_vec());
    }

    /// Number of queued read responses not yet consumed
    pub fn pending_reads(&self) -> usize {
        self.responses.borrow().len()
    }

    /// Fail the next transaction with `error`
    ///
    /// Calls accumulate: each one fails one more transaction.
    pub fn fail_next(&mut self, error: I2cError) {
        self.failures.borrow_mut().push_back(error);
    }

    /// Get current frequency
    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }

    fn check_failure(&self) -> Result<()> {
        match self.failures.borrow_mut().pop_front() {
            Some(e) => Err(PlatformError::I2c(e)),
            None => Ok(()),
        }
    }

    fn fill(&self, buffer: &mut [u8]) {
        buffer.fill(0);
        if let Some(data) = self.responses.borrow_mut().pop_front() {
            let n = buffer.len().min(data.len());
            buffer[..n].copy_from_slice(&data[..n]);
        }
    }
}

impl I2cInterface for MockI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.transactions.borrow_mut().push(I2cTransaction::Write {
            addr,
            data: data.to_vec(),
        });
        self.check_failure()
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.transactions.borrow_mut().push(I2cTransaction::Read {
            addr,
            len: buffer.len(),
        });
        self.check_failure()?;
        self.fill(buffer);
        Ok(())
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.transactions
            .borrow_mut()
            .push(I2cTransaction::WriteRead {
                addr,
                write_data: write_data.to_vec(),
                read_len: read_buffer.len(),
            });
        self.check_failure()?;
        self.fill(read_buffer);
        Ok(())
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        if frequency == 0 {
            return Err(PlatformError::InvalidConfig);
        }
        self.config.frequency = frequency;
        Ok(())
    }
}
