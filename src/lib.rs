//! A client library for SLMP (Seamless Message Protocol), used to
//! communicate with Mitsubishi Electric family PLC devices over Ethernet.
//!
//! # Examples
//! ```no_run
//! use slmp::client::Client;
//! use slmp::codec::frame::{Encoding, FrameKind};
//! use slmp::constant::{DeviceCode, Target};
//! use slmp::session::Profile;
//! use slmp::transport::tcp::{Options, TcpSocket};
//!
//! # fn main() -> Result<(), slmp::error::Error> {
//! let addr = "127.0.0.1:5000".parse().unwrap();
//! let options = Options::new(addr);
//! let profile = Profile {
//!     encoding: Encoding::Binary,
//!     frame: FrameKind::E4,
//! };
//! let client = Client::<TcpSocket>::new(options, profile, Target::default())?;
//!
//! let values = client.device_read_word(DeviceCode::D, 100, 4, 6)?;
//! println!("{:?}", values);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod constant;
pub mod correlator;
pub mod error;
pub mod session;
pub mod transport;
