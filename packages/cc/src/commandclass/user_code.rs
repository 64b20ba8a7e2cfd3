use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{
    bytes::{be_u8, rest},
    Parsable, ParseResult,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum UserCodeCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum UserIdStatus {
    Available = 0x00,
    Occupied = 0x01,
    ReservedByAdministrator = 0x02,
}

zip_core::impl_maybe_known_codec!(UserIdStatus);

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct UserCodeCCSet {
    pub user_id: u8,
    #[builder(setter(into))]
    pub status: MaybeKnown<UserIdStatus>,
    /// 4 to 10 ASCII digits
    pub code: Vec<u8>,
}

impl CCBase for UserCodeCCSet {}

impl CCId for UserCodeCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::UserCode
    }

    fn cc_command(&self) -> Option<u8> {
        Some(UserCodeCCCommand::Set as _)
    }
}

impl CCParsable for UserCodeCCSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let user_id = be_u8(i)?;
        let status = MaybeKnown::<UserIdStatus>::parse(i)?;
        let code = rest(i)?.to_vec();

        Ok(Self {
            user_id,
            status,
            code,
        })
    }
}

impl CCSerializable for UserCodeCCSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::{be_u8, slice};
        be_u8(self.user_id).serialize(output);
        self.status.serialize(output);
        slice(&self.code).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct UserCodeCCGet {
    pub user_id: u8,
}

impl CCBase for UserCodeCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::UserCodeCCReport(report) if report.user_id == self.user_id
        )
    }
}

impl CCId for UserCodeCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::UserCode
    }

    fn cc_command(&self) -> Option<u8> {
        Some(UserCodeCCCommand::Get as _)
    }
}

impl CCParsable for UserCodeCCGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let user_id = be_u8(i)?;
        Ok(Self { user_id })
    }
}

impl CCSerializable for UserCodeCCGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.user_id).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct UserCodeCCReport {
    pub user_id: u8,
    #[builder(setter(into))]
    pub status: MaybeKnown<UserIdStatus>,
    pub code: Vec<u8>,
}

impl CCBase for UserCodeCCReport {}

impl CCId for UserCodeCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::UserCode
    }

    fn cc_command(&self) -> Option<u8> {
        Some(UserCodeCCCommand::Report as _)
    }
}

impl CCParsable for UserCodeCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let user_id = be_u8(i)?;
        let status = MaybeKnown::<UserIdStatus>::parse(i)?;
        let code = rest(i)?.to_vec();

        Ok(Self {
            user_id,
            status,
            code,
        })
    }
}

impl CCSerializable for UserCodeCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::{be_u8, slice};
        be_u8(self.user_id).serialize(output);
        self.status.serialize(output);
        slice(&self.code).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("050131323334");
        let report = UserCodeCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.user_id, 5);
        assert_eq!(report.status, MaybeKnown::Known(UserIdStatus::Occupied));
        assert_eq!(report.code, b"1234");
    }

    #[test]
    fn test_get_matches_report_by_user_id() {
        let get = UserCodeCCGet::builder().user_id(5).build();
        let report = CC::UserCodeCCReport(
            UserCodeCCReport::builder()
                .user_id(5)
                .status(UserIdStatus::Occupied)
                .code(b"1234".to_vec())
                .build(),
        );
        assert!(get.test_report(&report));
    }
}
