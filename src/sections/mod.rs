mod cpu;
mod dump;
mod epow;
mod generic;
mod hotplug;
mod io;
mod lri;
mod memory;
mod mtms;
mod post;
mod private_header;
mod service_processor;
mod src;
mod user_header;
mod vendor;

use std::fmt::{self, Display};

use crate::section_header::V6Header;

pub use self::cpu::{CpuErrors, CpuSection};
pub(crate) use self::dump::{DUMP_ID_LEN_OFFSET, DUMP_OS_ID_OFFSET, padded_id_len};
pub use self::dump::{DUMP_OS_ID_MAX, DUMP_SECTION_SIZE, DumpFlags, DumpSection};
pub use self::epow::{
    EPOW_V6_SECTION_SIZE, EpowCauses, EpowPowerFaults, EpowSection, LegacyEpow, V6Epow,
    action_code_name,
};
pub use self::generic::GenericSection;
pub use self::hotplug::{HOTPLUG_SECTION_SIZE, HotplugSection, HotplugTarget};
pub use self::io::{
    IO_V6_FIXED_SIZE, IoBridgeErrors, IoBusErrors, IoSection, LegacyIo, PciIoa, V6Io,
};
pub use self::lri::{LRI_SECTION_SIZE, LriSection};
pub use self::memory::{MemoryBusErrors, MemoryErrors, MemorySection};
pub use self::mtms::{MTMS_SECTION_SIZE, Mtms, MtmsSection};
pub use self::post::{PostErrors, PostIplErrors, PostSection};
pub use self::private_header::{PRIVATE_HEADER_SIZE, PrivateHeader};
pub use self::service_processor::{
    ServiceProcessorSection, SpDeviceErrors, SpGeneralErrors, SpPcnErrors, SpPortErrors,
};
pub use self::src::{
    FruCallout, FruId, FruMr, FruPe, FruSubstructure, FruSubstructureHeader, MruEntry,
    SRC_SECTION_SIZE, SrcSection, SrcSubsection, priority_description,
};
pub use self::user_header::{USER_HEADER_SIZE, UserHeader, UserHeaderAction};
pub use self::vendor::{IbmDiagnosticSection, VendorErrorLog};

/// Discriminant of a decoded section, used for lookups on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    PrivateHeader,
    UserHeader,
    Epow,
    Io,
    Cpu,
    Memory,
    Post,
    IbmDiagnostic,
    ServiceProcessor,
    VendorErrorLog,
    Dump,
    LogicalResource,
    MachineType,
    PrimarySrc,
    SecondarySrc,
    Hotplug,
    Generic,
}

impl SectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::PrivateHeader => "private header",
            SectionKind::UserHeader => "user header",
            SectionKind::Epow => "EPOW",
            SectionKind::Io => "I/O",
            SectionKind::Cpu => "CPU",
            SectionKind::Memory => "memory",
            SectionKind::Post => "POST",
            SectionKind::IbmDiagnostic => "IBM diagnostic",
            SectionKind::ServiceProcessor => "service processor",
            SectionKind::VendorErrorLog => "vendor error log",
            SectionKind::Dump => "dump locator",
            SectionKind::LogicalResource => "logical resource",
            SectionKind::MachineType => "machine type",
            SectionKind::PrimarySrc => "primary SRC",
            SectionKind::SecondarySrc => "secondary SRC",
            SectionKind::Hotplug => "hotplug",
            SectionKind::Generic => "generic",
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The typed payload of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    PrivateHeader(PrivateHeader),
    UserHeader(UserHeader),
    Epow(EpowSection),
    Io(IoSection),
    Cpu(CpuSection),
    Memory(MemorySection),
    Post(PostSection),
    IbmDiagnostic(IbmDiagnosticSection),
    ServiceProcessor(ServiceProcessorSection),
    VendorErrorLog(VendorErrorLog),
    Dump(DumpSection),
    LogicalResource(LriSection),
    MachineType(MtmsSection),
    PrimarySrc(SrcSection),
    SecondarySrc(SrcSection),
    Hotplug(HotplugSection),
    Generic(GenericSection),
}

impl SectionBody {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionBody::PrivateHeader(_) => SectionKind::PrivateHeader,
            SectionBody::UserHeader(_) => SectionKind::UserHeader,
            SectionBody::Epow(_) => SectionKind::Epow,
            SectionBody::Io(_) => SectionKind::Io,
            SectionBody::Cpu(_) => SectionKind::Cpu,
            SectionBody::Memory(_) => SectionKind::Memory,
            SectionBody::Post(_) => SectionKind::Post,
            SectionBody::IbmDiagnostic(_) => SectionKind::IbmDiagnostic,
            SectionBody::ServiceProcessor(_) => SectionKind::ServiceProcessor,
            SectionBody::VendorErrorLog(_) => SectionKind::VendorErrorLog,
            SectionBody::Dump(_) => SectionKind::Dump,
            SectionBody::LogicalResource(_) => SectionKind::LogicalResource,
            SectionBody::MachineType(_) => SectionKind::MachineType,
            SectionBody::PrimarySrc(_) => SectionKind::PrimarySrc,
            SectionBody::SecondarySrc(_) => SectionKind::SecondarySrc,
            SectionBody::Hotplug(_) => SectionKind::Hotplug,
            SectionBody::Generic(_) => SectionKind::Generic,
        }
    }

    /// The common header, for sections that carry one.
    pub fn v6_header(&self) -> Option<&V6Header> {
        match self {
            SectionBody::PrivateHeader(s) => Some(&s.header),
            SectionBody::UserHeader(s) => Some(&s.header),
            SectionBody::Epow(EpowSection::V6(s)) => Some(&s.header),
            SectionBody::Io(IoSection::V6(s)) => Some(&s.header),
            SectionBody::Dump(s) => Some(&s.header),
            SectionBody::LogicalResource(s) => Some(&s.header),
            SectionBody::MachineType(s) => Some(&s.header),
            SectionBody::PrimarySrc(s) | SectionBody::SecondarySrc(s) => Some(&s.header),
            SectionBody::Hotplug(s) => Some(&s.header),
            SectionBody::Generic(s) => Some(&s.header),
            _ => None,
        }
    }
}

/// A decoded section together with the byte range it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    raw_offset: usize,
    raw_len: usize,
    body: SectionBody,
}

impl Section {
    pub(crate) fn new(raw_offset: usize, raw_len: usize, body: SectionBody) -> Self {
        Section {
            raw_offset,
            raw_len,
            body,
        }
    }

    /// Offset of the first byte of this section from the start of the event.
    pub fn raw_offset(&self) -> usize {
        self.raw_offset
    }

    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    pub fn raw_range(&self) -> std::ops::Range<usize> {
        self.raw_offset..self.raw_offset + self.raw_len
    }

    pub fn kind(&self) -> SectionKind {
        self.body.kind()
    }

    pub fn body(&self) -> &SectionBody {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut SectionBody {
        &mut self.body
    }

    pub fn v6_header(&self) -> Option<&V6Header> {
        self.body.v6_header()
    }
}
