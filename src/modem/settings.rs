//! One-command modem settings

use super::{LoRaModem, Value};
use crate::at::Arg;
use crate::config::modem::{Band, DeviceClass, JoinMode, RfMode};
use crate::error::ModemError;
use crate::transport::traits::{Clock, Transport};

/// Provisioning values written with a single command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Property {
    AppEui,
    AppKey,
    DevEui,
    DevAddr,
    NwkSKey,
    AppSKey,
}

impl Property {
    fn command(self) -> &'static str {
        match self {
            Property::AppEui => "+APPEUI=",
            Property::AppKey => "+APPKEY=",
            Property::DevEui => "+DEVEUI=",
            Property::DevAddr => "+DEVADDR=",
            Property::NwkSKey => "+NWKSKEY=",
            Property::AppSKey => "+APPSKEY=",
        }
    }
}

impl<T: Transport, C: Clock, const N: usize> LoRaModem<T, C, N> {
    fn set(&mut self, property: Property, value: &str) -> Result<(), ModemError> {
        self.exchange(property.command(), &[Arg::Str(value)])
    }

    /// Application EUI (hex text)
    pub fn set_app_eui(&mut self, value: &str) -> Result<(), ModemError> {
        self.set(Property::AppEui, value)
    }

    /// Application key (hex text)
    pub fn set_app_key(&mut self, value: &str) -> Result<(), ModemError> {
        self.set(Property::AppKey, value)
    }

    /// Device EUI (hex text)
    pub fn set_dev_eui(&mut self, value: &str) -> Result<(), ModemError> {
        self.set(Property::DevEui, value)
    }

    /// Device address (hex text)
    pub fn set_dev_addr(&mut self, value: &str) -> Result<(), ModemError> {
        self.set(Property::DevAddr, value)
    }

    /// Network session key (hex text)
    pub fn set_nwk_skey(&mut self, value: &str) -> Result<(), ModemError> {
        self.set(Property::NwkSKey, value)
    }

    /// Application session key (hex text)
    pub fn set_app_skey(&mut self, value: &str) -> Result<(), ModemError> {
        self.set(Property::AppSKey, value)
    }

    /// Select OTAA or ABP
    pub fn change_mode(&mut self, mode: JoinMode) -> Result<(), ModemError> {
        self.exchange("+MODE=", &[Arg::from(mode as u8)])
    }

    /// Select the device class
    pub fn configure_class(&mut self, class: DeviceClass) -> Result<(), ModemError> {
        self.exchange("+CLASS=", &[Arg::Str(class.as_str())])
    }

    /// Select the frequency plan. EU868 on the vendor firmware also turns
    /// duty cycle enforcement on.
    pub fn configure_band(&mut self, band: Band) -> Result<(), ModemError> {
        self.exchange("+BAND=", &[Arg::from(band as u8)])?;
        if band == Band::EU868 && self.is_arduino_fw() {
            return self.duty_cycle(true);
        }
        Ok(())
    }

    /// Change the modem UART speed. The modem answers at the new rate, so
    /// no reply is awaited.
    pub fn set_baud(&mut self, baud: u32) {
        self.port.send_command("+UART=", &[Arg::from(baud)]);
    }

    /// Restore factory settings
    pub fn factory_default(&mut self) -> Result<(), ModemError> {
        self.exchange("+FACNEW", &[])
    }

    /// Select the RF output and power index (0..=5)
    pub fn power(&mut self, mode: RfMode, level: u8) -> Result<(), ModemError> {
        self.exchange("+RFPOWER=", &[Arg::from(mode as u8), Arg::from(level)])?;
        // The modem echoes the applied setting on the rest of the line
        let _ = self.port.read_until(b'\r');
        Ok(())
    }

    /// Enable or disable duty cycle enforcement
    pub fn duty_cycle(&mut self, on: bool) -> Result<(), ModemError> {
        self.exchange("+DUTYCYCLE=", &[Arg::Bool(on)])
    }

    /// Application port for uplinks
    pub fn set_port(&mut self, port: u8) -> Result<(), ModemError> {
        self.exchange("+PORT=", &[Arg::from(port)])
    }

    /// Public or private network sync word
    pub fn public_network(&mut self, public: bool) -> Result<(), ModemError> {
        self.exchange("+NWK=", &[Arg::Bool(public)])
    }

    /// Enter or leave sleep mode
    pub fn sleep(&mut self, on: bool) -> Result<(), ModemError> {
        self.exchange("+SLEEP=", &[Arg::Bool(on)])
    }

    /// Hex (`true`) or binary data format
    pub fn format(&mut self, hex_mode: bool) -> Result<(), ModemError> {
        self.exchange("+DFORMAT=", &[Arg::Bool(hex_mode)])
    }

    /// Uplink data rate index
    ///
    /// | DR | SF | BW  | bit/s  |
    /// |----|----|-----|--------|
    /// | 0  | 12 | 125 | 250    |
    /// | 1  | 11 | 125 | 440    |
    /// | 2  | 10 | 125 | 980    |
    /// | 3  | 9  | 125 | 1760   |
    /// | 4  | 8  | 125 | 3125   |
    /// | 5  | 7  | 125 | 5470   |
    /// | 6  | 7  | 250 | 11000  |
    pub fn set_data_rate(&mut self, data_rate: u8) -> Result<(), ModemError> {
        self.exchange("+DR=", &[Arg::from(data_rate)])
    }

    /// Current uplink data rate index
    pub fn data_rate(&mut self) -> Result<u8, ModemError> {
        self.query_parsed("+DR?")
    }

    /// Enable or disable adaptive data rate
    pub fn set_adr(&mut self, adr: bool) -> Result<(), ModemError> {
        self.exchange("+ADR=", &[Arg::Bool(adr)])
    }

    /// Whether adaptive data rate is on
    pub fn adr(&mut self) -> Result<bool, ModemError> {
        self.query_parsed::<u8>("+ADR?").map(|adr| adr != 0)
    }

    /// Set the uplink frame counter
    pub fn set_fcu(&mut self, fcu: u16) -> Result<(), ModemError> {
        self.exchange("+FCU=", &[Arg::from(fcu)])
    }

    /// Uplink frame counter
    pub fn fcu(&mut self) -> Result<u32, ModemError> {
        self.query_parsed("+FCU?")
    }

    /// Set the downlink frame counter
    pub fn set_fcd(&mut self, fcd: u16) -> Result<(), ModemError> {
        self.exchange("+FCD=", &[Arg::from(fcd)])
    }

    /// Downlink frame counter
    pub fn fcd(&mut self) -> Result<u32, ModemError> {
        self.query_parsed("+FCD?")
    }

    /// Device EUI
    pub fn device_eui(&mut self) -> Result<Value, ModemError> {
        self.query("+DEVEUI?")
    }

    /// Device address
    pub fn dev_addr(&mut self) -> Result<Value, ModemError> {
        self.query("+DEVADDR?")
    }

    /// Network session key
    pub fn nwk_skey(&mut self) -> Result<Value, ModemError> {
        self.query("+NWKSKEY?")
    }

    /// Application session key
    pub fn app_skey(&mut self) -> Result<Value, ModemError> {
        self.query("+APPSKEY?")
    }
}
