use core::time::Duration;

use lorawan_modem::{
    at::Dialect,
    config::{Band, ModemConfig},
    transport::ByteStream,
    LoRaModem, ModemError,
};

use mock::{MockClock, MockTransport};

const APP_EUI: &str = "0011223344556677";
const APP_KEY: &str = "00112233445566778899AABBCCDDEEFF";

// Test helper to create a modem with shared mock handles
fn create_test_modem(
    dialect: Dialect,
) -> (LoRaModem<MockTransport, MockClock>, MockTransport, MockClock) {
    let transport = MockTransport::new();
    let clock = MockClock::new();
    let modem = LoRaModem::new(
        transport.clone(),
        clock.clone(),
        dialect,
        ModemConfig::default(),
    );
    (modem, transport, clock)
}

fn script_init(transport: &MockTransport, firmware: &[u8]) {
    transport.reply_to(b"AT\r", b"+OK\r");
    transport.reply_to(b"AT+DEV?\r", b"+OK=ARD-078\r");
    let mut reply = b"+OK=".to_vec();
    reply.extend_from_slice(firmware);
    reply.push(b'\r');
    transport.reply_to(b"AT+VER?\r", &reply);
}

fn script_otaa_setup(transport: &MockTransport) {
    transport.reply_to(b"AT+MODE=1\r", b"+OK\r");
    transport.reply_to(b"AT+APPEUI=0011223344556677\r", b"+OK\r");
    transport.reply_to(b"AT+APPKEY=00112233445566778899AABBCCDDEEFF\r", b"+OK\r");
}

#[test]
fn test_init_reads_version() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    script_init(&transport, b"1.1.9");

    modem.init().unwrap();

    assert_eq!(modem.firmware_version(), "ARD-078 1.1.9");
    assert!(!modem.compatibility_mode());
    assert!(modem.is_arduino_fw());
    assert_eq!(transport.written(), b"AT\rAT+DEV?\rAT+VER?\r");
}

#[test]
fn test_long_version_fields_kept_whole() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    let device = "ARD-078-MURATA-CMWX1ZZABZ-REVISION-B-LONG-NAME-X01";
    transport.reply_to(b"AT\r", b"+OK\r");
    transport.reply_to(b"AT+DEV?\r", format!("+OK={}\r", device).as_bytes());
    transport.reply_to(b"AT+VER?\r", b"+OK=1.1.9-build-2024\r");

    modem.init().unwrap();

    assert_eq!(
        modem.firmware_version(),
        format!("{} 1.1.9-build-2024", device)
    );
    assert!(modem.is_arduino_fw());
}

#[test]
fn test_old_firmware_uses_compatibility_mode() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    script_init(&transport, b"1.1.6");
    modem.init().unwrap();
    assert!(modem.compatibility_mode());

    // Only OK and the generic error are recognized
    transport.reply_to(b"AT+ADR=1\r", b"+ERR_BUSY\r");
    assert_eq!(modem.set_adr(true), Err(ModemError::Timeout));

    modem.set_compatibility_mode(false);
    transport.reply_to(b"AT+ADR=1\r", b"+ERR_BUSY\r");
    assert_eq!(modem.set_adr(true), Err(ModemError::Busy));
}

#[test]
fn test_auto_baud_gives_up() {
    let (mut modem, transport, clock) = create_test_modem(Dialect::arduino());

    assert_eq!(modem.auto_baud(), Err(ModemError::Timeout));
    assert!(clock.elapsed() >= modem.config().autobaud_timeout);
    assert!(transport.write_calls() > 1);
}

#[test]
fn test_begin_enables_duty_cycle_on_eu868() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    script_init(&transport, b"1.1.9");
    transport.reply_to(b"AT+BAND=5\r", b"+OK\r");
    transport.reply_to(b"AT+DUTYCYCLE=1\r", b"+OK\r");

    modem.begin(Band::EU868).unwrap();

    assert!(transport.written().ends_with(b"AT+BAND=5\rAT+DUTYCYCLE=1\r"));
    assert_eq!(transport.unreleased_replies(), 0);
}

#[test]
fn test_restart() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT\r", b"+OK\r");
    transport.reply_to(b"AT+REBOOT\r", b"+EVENT=0,0\r");
    script_init(&transport, b"1.1.9");

    modem.restart().unwrap();

    assert_eq!(modem.firmware_version(), "ARD-078 1.1.9");
    assert_eq!(transport.unreleased_replies(), 0);
}

#[test]
fn test_join_otaa() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    script_otaa_setup(&transport);
    transport.reply_to(b"AT+JOIN\r", b"+OK\r+EVENT=1,1\r");

    let joined = modem
        .join_otaa(APP_EUI, APP_KEY, None, Duration::from_secs(5))
        .unwrap();

    assert!(joined);
    assert!(modem.is_joined());
    assert!(modem.connected());
}

#[test]
fn test_join_otaa_timeout() {
    let (mut modem, transport, clock) = create_test_modem(Dialect::arduino());
    script_otaa_setup(&transport);
    transport.reply_to(b"AT+JOIN\r", b"+OK\r");

    let timeout = Duration::from_secs(2);
    let joined = modem.join_otaa(APP_EUI, APP_KEY, None, timeout).unwrap();

    assert!(!joined);
    assert!(!modem.is_joined());
    assert!(clock.elapsed() >= timeout);
}

#[test]
fn test_join_otaa_setup_error() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT+MODE=1\r", b"+OK\r");
    transport.reply_to(b"AT+APPEUI=0011223344556677\r", b"+OK\r");
    transport.reply_to(b"AT+APPKEY=00112233445566778899AABBCCDDEEFF\r", b"+ERR_PARAM\r");

    let result = modem.join_otaa(APP_EUI, APP_KEY, None, Duration::from_secs(5));

    assert_eq!(result, Err(ModemError::Parameter));
    let written = transport.written();
    assert!(!written.windows(7).any(|w| w == b"AT+JOIN"));
}

#[test]
fn test_join_otaa_with_dev_eui() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    script_otaa_setup(&transport);
    transport.reply_to(b"AT+DEVEUI=70B3D57ED0000001\r", b"+OK\r");
    transport.reply_to(b"AT+JOIN\r", b"+OK\r+EVENT=1,1\r");

    let joined = modem
        .join_otaa(APP_EUI, APP_KEY, Some("70B3D57ED0000001"), Duration::from_secs(5))
        .unwrap();

    assert!(joined);
    assert_eq!(transport.unreleased_replies(), 0);
}

#[test]
fn test_join_otaa_verified_by_status() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::legacy());
    script_otaa_setup(&transport);
    transport.reply_to(b"AT+JOIN\r", b"+OK\r+EVENT=1,1\r");
    transport.reply_to(b"AT+NJS?\r", b"+OK=0\r");

    let joined = modem
        .join_otaa(APP_EUI, APP_KEY, None, Duration::from_secs(5))
        .unwrap();

    // The event said joined, the status query did not
    assert!(!joined);
}

#[test]
fn test_join_abp() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT+MODE=0\r", b"+OK\r");
    transport.reply_to(b"AT+DEVADDR=26011BDA\r", b"+OK\r");
    transport.reply_to(b"AT+NWKSKEY=000102030405060708090A0B0C0D0E0F\r", b"+OK\r");
    transport.reply_to(b"AT+APPSKEY=0F0E0D0C0B0A09080706050403020100\r", b"+OK\r");
    transport.reply_to(b"AT+JOIN\r", b"+OK\r");
    transport.reply_to(b"AT+NJS?\r", b"+OK=1\r");

    let joined = modem
        .join_abp(
            "26011BDA",
            "000102030405060708090A0B0C0D0E0F",
            "0F0E0D0C0B0A09080706050403020100",
            Duration::from_secs(1),
        )
        .unwrap();

    assert!(joined);
    assert!(modem.is_joined());
}

#[test]
fn test_send_unconfirmed() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT+UTX 5\r", b"+OK\r");

    assert_eq!(modem.send(b"Hello", false), Ok(5));
    assert_eq!(transport.written(), b"AT+UTX 5\rHello");
}

#[test]
fn test_send_confirmed_raw() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT+CTX 2\r", b"+OK\r");

    assert_eq!(modem.send(&[0xCA, 0xFE], true), Ok(2));
    assert_eq!(transport.written(), b"AT+CTX 2\r\xCA\xFE");
}

#[test]
fn test_send_rejects_oversized_payload() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());

    let result = modem.send(&[0u8; 65], false);

    assert_eq!(result, Err(ModemError::PayloadTooLarge));
    assert_eq!(result.unwrap_err().code(), -20);
    assert_eq!(transport.write_calls(), 0);
}

#[test]
fn test_send_error_mapping() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());

    transport.reply_to(b"AT+UTX 1\r", b"+ERR_BUSY\r");
    let error = modem.send(b"x", false).unwrap_err();
    assert_eq!(error, ModemError::Busy);
    assert_eq!(error.code(), -4);

    transport.reply_to(b"AT+UTX 1\r", b"+ERR_NO_NETWORK\r");
    assert_eq!(modem.send(b"x", false), Err(ModemError::NoNetwork));

    // No reply at all
    let error = modem.send(b"x", false).unwrap_err();
    assert_eq!(error, ModemError::Timeout);
    assert_eq!(error.code(), -1);
}

#[test]
fn test_hex_send_waits_for_confirmation() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::hex_events());

    transport.reply_to(b"AT+CSEND=4869\r", b"+OK\r");
    assert_eq!(modem.send(b"Hi", true), Err(ModemError::Timeout));

    transport.reply_to(b"AT+CSEND=4869\r", b"+OK\r+ACK\r");
    assert_eq!(modem.send(b"Hi", true), Ok(2));

    // Unconfirmed uplinks do not wait for the acknowledgement
    transport.reply_to(b"AT+SEND=4869\r", b"+OK\r");
    assert_eq!(modem.send(b"Hi", false), Ok(2));
}

#[test]
fn test_payload_limit_queried() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::legacy());
    transport.reply_to(b"AT+MSIZE?\r", b"+OK=11\r");

    assert_eq!(modem.refresh_max_payload_size(), 11);
    assert_eq!(modem.max_payload_size(), 11);
    let calls = transport.write_calls();

    // The cached limit is checked without talking to the modem
    assert_eq!(modem.send(&[0u8; 12], false), Err(ModemError::PayloadTooLarge));
    assert_eq!(transport.write_calls(), calls);

    transport.reply_to(b"AT+UTX 11\r", b"+OK\r");
    assert_eq!(modem.send(&[0u8; 11], false), Ok(11));
}

#[test]
fn test_unknown_payload_limit_rejects_without_io() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::legacy());

    assert_eq!(modem.max_payload_size(), 0);
    assert_eq!(modem.send(&[0u8; 300], false), Err(ModemError::PayloadTooLarge));
    assert_eq!(transport.write_calls(), 0);
}

#[test]
fn test_failed_limit_query_falls_back_to_zero() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::legacy());
    script_init(&transport, b"1.1.9");

    // No answer to AT+MSIZE?
    modem.init().unwrap();
    assert_eq!(modem.max_payload_size(), 0);

    let calls = transport.write_calls();
    assert_eq!(modem.send(b"x", false), Err(ModemError::PayloadTooLarge));
    assert_eq!(transport.write_calls(), calls);
}

#[test]
fn test_init_learns_payload_limit() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::legacy());
    script_init(&transport, b"1.1.9");
    transport.reply_to(b"AT+MSIZE?\r", b"+OK=51\r");

    modem.init().unwrap();

    assert_eq!(modem.max_payload_size(), 51);
}

#[test]
fn test_poll_interval() {
    let (mut modem, transport, clock) = create_test_modem(Dialect::arduino());
    modem.min_poll_interval(60);

    assert_eq!(modem.poll(), Ok(false));
    assert_eq!(transport.write_calls(), 0);

    clock.advance(Duration::from_secs(61));
    transport.reply_to(b"AT+UTX 0\r", b"+OK\r");
    assert_eq!(modem.poll(), Ok(true));
    assert_eq!(transport.written(), b"AT+UTX 0\r");

    // Interval restarts from the last poll
    assert_eq!(modem.poll(), Ok(false));
}

#[test]
fn test_downlink_stream() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.push_inbound(b"+RECV=3,4\r\n\r\nabcd");

    assert_eq!(modem.parse_packet(), 4);
    assert!(modem.connected());
    assert_eq!(modem.read_byte(), Some(b'a'));
    assert_eq!(modem.peek(), Some(b'b'));

    let mut buf = [0u8; 8];
    assert_eq!(modem.read(&mut buf), 3);
    assert_eq!(&buf[..3], b"bcd");
    assert_eq!(modem.read_byte(), None);
}

#[test]
fn test_downlink_collected_during_exchange() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT+PORT=2\r", b"+RECV=2,2\r\n\r\nok+OK\r");

    modem.set_port(2).unwrap();

    let mut buf = [0u8; 4];
    assert_eq!(modem.read(&mut buf), 2);
    assert_eq!(&buf[..2], b"ok");
}

#[test]
fn test_packet_api() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT+UTX 3\r", b"+OK\r");

    modem.begin_packet();
    assert_eq!(modem.write(b"ab"), 2);
    assert!(modem.write_byte(b'c'));

    assert_eq!(modem.end_packet(false), Ok(3));
    assert_eq!(transport.written(), b"AT+UTX 3\rabc");
}

#[test]
fn test_settings_queries() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT+DR?\r", b"+OK=5\r");
    transport.reply_to(b"AT+ADR?\r", b"+OK=1\r");
    transport.reply_to(b"AT+DEVADDR?\r", b"+OK=26011BDA\r");
    transport.reply_to(b"AT+FCU?\r", b"+OK=1234\r");

    assert_eq!(modem.data_rate(), Ok(5));
    assert_eq!(modem.adr(), Ok(true));
    assert_eq!(modem.dev_addr().unwrap().as_str(), "26011BDA");
    assert_eq!(modem.fcu(), Ok(1234));
}

#[test]
fn test_query_rejects_bad_value() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT+DR?\r", b"+OK=fast\r");

    assert_eq!(modem.data_rate(), Err(ModemError::InvalidResponse));
}

#[test]
fn test_settings_commands() {
    let (mut modem, transport, _clock) = create_test_modem(Dialect::arduino());
    transport.reply_to(b"AT+DR=3\r", b"+OK\r");
    transport.reply_to(b"AT+NWK=1\r", b"+OK\r");
    transport.reply_to(b"AT+FCU=7\r", b"+ERR_PARAM\r");

    modem.set_data_rate(3).unwrap();
    modem.public_network(true).unwrap();
    assert_eq!(modem.set_fcu(7), Err(ModemError::Parameter));

    modem.set_baud(19200);
    assert!(transport.written().ends_with(b"AT+UART=19200\r"));
}
