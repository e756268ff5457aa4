use mfulmap::constants::ACK;
use mfulmap::protocol::Command;
use mfulmap::test_support::{empty_ndef_tag, payload};
use mfulmap::transport::{MockTag, MockTransport, Transport};
use mfulmap::Error;

fn exchange(mock: &mut MockTransport, command: Command) -> Result<Vec<u8>, Error> {
    mock.transceive(&command.to_request()?)?;
    mock.take_reply().unwrap_or(Err(Error::InvalidDeviceRequest))
}

#[test]
fn formatted_tag_serves_cc() -> anyhow::Result<()> {
    let mut mock = MockTransport::new(empty_ndef_tag(0x06));
    let reply = exchange(&mut mock, Command::Read { block: 3 })?;
    assert_eq!(&reply[..7], &[0xE1, 0x10, 0x06, 0x00, 0x03, 0x00, 0xFE]);
    Ok(())
}

#[test]
fn writes_land_in_the_selected_sector() -> anyhow::Result<()> {
    let mut mock = MockTransport::new(MockTag::new(2));
    assert_eq!(exchange(&mut mock, Command::SectorSelectIntent)?, vec![ACK]);
    assert!(exchange(&mut mock, Command::SectorSelectTarget { sector: 1 })?.is_empty());
    exchange(
        &mut mock,
        Command::Write {
            block: 0,
            data: [1, 2, 3, 4],
        },
    )?;
    let tag = mock.tag();
    assert_eq!(&tag.memory()[1024..1028], &[1, 2, 3, 4]);
    assert_eq!(&tag.memory()[0..4], &[0, 0, 0, 0]);
    Ok(())
}

#[test]
fn missing_sector_is_a_transport_error() {
    let mut mock = MockTransport::new(MockTag::new(1));
    exchange(&mut mock, Command::SectorSelectIntent).unwrap();
    assert!(matches!(
        exchange(&mut mock, Command::SectorSelectTarget { sector: 1 }),
        Err(Error::Transport(_))
    ));
}

#[test]
fn dump_shows_blocks() {
    let mut tag = MockTag::with_memory(payload(32));
    tag.memory_mut()[16] = 0x03;
    let dump = tag.dump(4, 1);
    assert!(dump.starts_with("04: 03"), "{}", dump);
    assert_eq!(tag.sectors(), 1);
}

#[test]
fn reply_order_matches_submission() -> anyhow::Result<()> {
    let mut mock = MockTransport::new(MockTag::new(1));
    mock.transceive(&Command::Read { block: 0 }.to_request()?)?;
    mock.transceive(
        &Command::Write {
            block: 4,
            data: [9; 4],
        }
        .to_request()?,
    )?;
    assert_eq!(mock.take_reply().unwrap()?.len(), 16);
    assert_eq!(mock.take_reply().unwrap()?, vec![ACK]);
    assert!(mock.take_reply().is_none());
    assert_eq!(mock.sent_count(), 2);
    Ok(())
}
