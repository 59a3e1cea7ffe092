//! Adapters from common I/O traits to the serial traits

use embedded_io::{Read, ReadReady, Write};

use crate::serial::{ErrorType, SerialRx, SerialTx};

/// Serial port backed by an `embedded-io` implementation
///
/// The port must report readiness so a poll with nothing buffered returns
/// immediately instead of waiting in `read`.
pub struct EmbeddedIoSerial<T> {
    inner: T,
}

impl<T> EmbeddedIoSerial<T> {
    /// Wrap an `embedded-io` port
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Get a mutable reference to the wrapped port
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the port
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: embedded_io::ErrorType> ErrorType for EmbeddedIoSerial<T> {
    type Error = T::Error;
}

impl<T: Read + ReadReady> SerialRx for EmbeddedIoSerial<T> {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() || !self.inner.read_ready()? {
            return Ok(0);
        }
        self.inner.read(buf)
    }
}

impl<T: Write> SerialTx for EmbeddedIoSerial<T> {
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}


#[cfg(feature = "std")]
pub use self::std_io::{IoSerial, StdDelay};

#[cfg(feature = "std")]
mod std_io {
    use std::io::{self, ErrorKind};
    use std::time::Duration;

    use embedded_hal::delay::DelayNs;

    use crate::serial::{ErrorType, SerialRx, SerialTx};

    /// Serial port backed by a `std::io` handle opened with a short read timeout
    ///
    /// Timeouts and would-block reads are reported as "nothing available".
    pub struct IoSerial<T> {
        inner: T,
    }

    impl<T> IoSerial<T> {
        /// Wrap a `std::io` port
        pub fn new(inner: T) -> Self {
            Self { inner }
        }

        /// Unwrap the port
        pub fn into_inner(self) -> T {
            self.inner
        }
    }

    impl<T> ErrorType for IoSerial<T> {
        type Error = io::Error;
    }

    impl<T: io::Read> SerialRx for IoSerial<T> {
        fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            match self.inner.read(buf) {
                Ok(n) => Ok(n),
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) =>
                {
                    Ok(0)
                }
                Err(e) => Err(e),
            }
        }
    }

    impl<T: io::Write> SerialTx for IoSerial<T> {
        fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.inner.write_all(data)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.inner.flush()
        }
    }

    /// Delay provider backed by `std::thread::sleep`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StdDelay;

    impl DelayNs for StdDelay {
        fn delay_ns(&mut self, ns: u32) {
            std::thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Cursor;

        struct TimingOut;

        impl io::Read for TimingOut {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(ErrorKind::TimedOut, "no data"))
            }
        }

        #[test]
        fn test_timeout_reads_as_empty() {
            let mut port = IoSerial::new(TimingOut);
            let mut buf = [0u8; 8];
            assert_eq!(port.read_available(&mut buf).unwrap(), 0);
        }

        #[test]
        fn test_reads_buffered_bytes() {
            let mut port = IoSerial::new(Cursor::new(b"ok\n".to_vec()));
            let mut buf = [0u8; 8];
            assert_eq!(port.read_available(&mut buf).unwrap(), 3);
            assert_eq!(&buf[..3], b"ok\n");
        }

        #[test]
        fn test_write_goes_through() {
            let mut port = IoSerial::new(Cursor::new(Vec::new()));
            port.write_all(b"handshake stage1 init\n").unwrap();
            port.flush().unwrap();
            assert_eq!(port.into_inner().into_inner(), b"handshake stage1 init\n");
        }
    }
}
