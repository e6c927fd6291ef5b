use std::fmt::{self, Write};

use bitflags::Flags;

use crate::event_header::{EventHeader, ExtendedContext, ExtendedHeader, ExtendedStatus};
use crate::render::writer::TextWriter;
use crate::section_header::V6Header;
use crate::sections::{
    CpuErrors, CpuSection, DumpFlags, DumpSection, EpowCauses, EpowPowerFaults, EpowSection,
    FruCallout, FruId, FruMr, FruPe, FruSubstructure, FruSubstructureHeader, GenericSection,
    HotplugSection, HotplugTarget, IbmDiagnosticSection, IoBridgeErrors, IoBusErrors, IoSection,
    LegacyEpow, LegacyIo, LriSection, MemoryBusErrors, MemoryErrors, MemorySection, Mtms,
    MtmsSection, PciIoa, PostErrors, PostIplErrors, PostSection, PrivateHeader,
    SectionBody, ServiceProcessorSection, SpDeviceErrors, SpGeneralErrors, SpPcnErrors,
    SpPortErrors, SrcSection, UserHeader, V6Epow, V6Io, VendorErrorLog,
};

type FlagMessages<F> = &'static [(F, &'static str)];

/// One line per flag of `table` that is set in `flags`, in table order.
fn flag_lines<F: Flags + Copy>(w: &mut TextWriter, flags: F, table: FlagMessages<F>) -> fmt::Result {
    for (flag, message) in table {
        if flags.contains(*flag) {
            w.line(message)?;
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

pub(crate) fn write_event_header(
    w: &mut TextWriter,
    header: &EventHeader,
    detailed: bool,
) -> fmt::Result {
    w.hex_field("Version:", u32::from(header.version), "    ")?;
    w.hex_field("Severity:", u32::from(header.severity), "")?;
    writeln!(w, " ({})", header.severity_name())?;

    if header.disposition != 0 || detailed {
        w.hex_field("Disposition:", u32::from(header.disposition), "")?;
        writeln!(w, " ({})", header.disposition_name())?;
    }

    if detailed {
        w.hex_field("Extended:", u32::from(header.extended), "    ")?;
        w.hex_field("Log Length:", header.ext_log_length, "\n")?;
    }

    if header.initiator != 0 || detailed {
        w.hex_field("Initiator", u32::from(header.initiator), "")?;
        writeln!(w, " ({})", header.initiator_name())?;
    }

    if header.target != 0 || detailed {
        w.hex_field("Target", u32::from(header.target), "")?;
        writeln!(w, " ({})", header.target_name())?;
    }

    w.hex_field("Type", u32::from(header.event_type), "")?;
    writeln!(w, " ({})", header.event_type_name())
}

const CONTEXT_V3_MESSAGES: FlagMessages<ExtendedContext> = &[
    (
        ExtendedContext::NON_HARDWARE,
        "Error may be caused by defects in software or firmware.",
    ),
    (
        ExtendedContext::HOT_PLUG,
        "Error is isolated to hot-pluggable unit.",
    ),
    (
        ExtendedContext::GROUP_FAILURE,
        "Error is isolated to a group of failing units.",
    ),
];

const CONTEXT_MESSAGES: FlagMessages<ExtendedContext> = &[
    (ExtendedContext::RESIDUAL, "Residual error from previous boot."),
    (ExtendedContext::BOOT, "Error detected during IPL process."),
    (
        ExtendedContext::CONFIG_CHANGE,
        "Configuration changed since last boot.",
    ),
    (ExtendedContext::POST, "Error detected prior to IPL."),
];

pub(crate) fn write_extended_header(
    w: &mut TextWriter,
    ext: &ExtendedHeader,
    version: u8,
) -> fmt::Result {
    if !ext.is_valid() {
        if ext.status.contains(ExtendedStatus::BIG_ENDIAN) && ext.power_pc {
            return w.write_str("Extended log data is not valid.\n\n");
        }
        return w.write_str("Extended log data can not be decoded.\n\n");
    }

    let status = [
        (ExtendedStatus::UNRECOVERABLE, " unrecoverable"),
        (ExtendedStatus::RECOVERABLE, " recoverable"),
        (ExtendedStatus::UNRECOVERABLE_BYPASSED, " bypassed"),
        (ExtendedStatus::PREDICTIVE, " predictive"),
        (ExtendedStatus::NEW_LOG, " new"),
    ];
    write!(w, "{:<19}", "Status:")?;
    for (flag, word) in status {
        if ext.status.contains(flag) {
            w.write_str(word)?;
        }
    }
    w.write_char('\n')?;

    if version >= 6 {
        return w.write_char('\n');
    }

    if version >= 3 {
        flag_lines(w, ext.context, CONTEXT_V3_MESSAGES)?;
    }
    flag_lines(w, ext.context, CONTEXT_MESSAGES)?;

    let (date, time) = (&ext.date, &ext.time);
    write!(
        w,
        "{:<20}{:x}/{:x}/{:x}  ",
        "Date:", date.year, date.month, date.day
    )?;
    writeln!(
        w,
        "{:<20}{:x}:{:x}:{:x}:{:x}\n",
        "Time:", time.hour, time.minutes, time.seconds, time.hundredths
    )
}

/// Section title, followed by the common header fields in detailed mode.
fn write_v6_header(
    w: &mut TextWriter,
    title: &str,
    header: &V6Header,
    detailed: bool,
) -> fmt::Result {
    w.title(title)?;
    if !detailed {
        return Ok(());
    }

    write!(w, "{:<20}      {}    ", "Section ID:", header.id_str())?;
    w.hex_field("Section Length:", u32::from(header.length), "\n")?;
    w.hex_pair(
        ("Version:", u32::from(header.version)),
        ("Sub_type:", u32::from(header.subtype)),
    )?;
    w.hex_field("Component ID:", u32::from(header.creator_comp_id), "\n")
}

/// Dispatches on the section kind.
pub(crate) fn write_section(w: &mut TextWriter, body: &SectionBody, detailed: bool) -> fmt::Result {
    match body {
        SectionBody::PrivateHeader(ph) => write_private_header(w, ph, detailed),
        SectionBody::UserHeader(uh) => write_user_header(w, uh, detailed),
        SectionBody::Epow(EpowSection::V6(epow)) => write_v6_epow(w, epow, detailed),
        SectionBody::Epow(EpowSection::Legacy(epow)) => write_legacy_epow(w, epow),
        SectionBody::Io(IoSection::V6(io)) => write_v6_io(w, io, detailed),
        SectionBody::Io(IoSection::Legacy(io)) => write_legacy_io(w, io),
        SectionBody::Cpu(cpu) => write_cpu(w, cpu),
        SectionBody::Memory(mem) => write_memory(w, mem),
        SectionBody::Post(post) => write_post(w, post),
        SectionBody::IbmDiagnostic(diag) => write_ibm_diagnostic(w, diag),
        SectionBody::ServiceProcessor(sp) => write_service_processor(w, sp),
        SectionBody::VendorErrorLog(vendor) => write_vendor_log(w, vendor),
        SectionBody::Dump(dump) => write_dump(w, dump, detailed),
        SectionBody::LogicalResource(lri) => write_lri(w, lri, detailed),
        SectionBody::MachineType(mt) => write_machine_type(w, mt, detailed),
        SectionBody::PrimarySrc(src) | SectionBody::SecondarySrc(src) => {
            write_src(w, src, detailed)
        }
        SectionBody::Hotplug(hp) => write_hotplug(w, hp, detailed),
        SectionBody::Generic(generic) => write_generic(w, generic),
    }
}

fn month_name(bcd_month: u8) -> &'static str {
    match bcd_month {
        0x01 => "January",
        0x02 => "February",
        0x03 => "March",
        0x04 => "April",
        0x05 => "May",
        0x06 => "June",
        0x07 => "July",
        0x08 => "August",
        0x09 => "September",
        0x10 => "October",
        0x11 => "November",
        0x12 => "December",
        _ => "",
    }
}

fn write_private_header(w: &mut TextWriter, ph: &PrivateHeader, detailed: bool) -> fmt::Result {
    write_v6_header(w, "Private Header", &ph.header, detailed)?;

    writeln!(
        w,
        "{:<20}{:x} {} {:x}",
        "Date:",
        ph.date.day,
        month_name(ph.date.month),
        ph.date.year
    )?;
    writeln!(
        w,
        "{:<20}{:x}:{:x}:{:x}:{:x}",
        "Time:", ph.time.hour, ph.time.minutes, ph.time.seconds, ph.time.hundredths
    )?;
    writeln!(
        w,
        "{:<20}{} ({}).",
        "Creator ID:",
        ph.creator_name(),
        char::from(ph.creator_id)
    )?;

    if detailed {
        w.hex_field("Section Count:", u32::from(ph.scn_count), "\n")?;
    }

    match &ph.creator_subid_name {
        Some(name) => writeln!(w, "Creator Subsystem Name: {}.", name)?,
        None => writeln!(
            w,
            "Creator Subsystem Version: {:08x}{:08x}.",
            ph.creator_subid_hi, ph.creator_subid_lo
        )?,
    }

    w.hex_pair(("Platform Log ID:", ph.plid), ("Log Entry ID:", ph.log_entry_id))?;
    w.write_char('\n')
}

fn write_user_header(w: &mut TextWriter, uh: &UserHeader, detailed: bool) -> fmt::Result {
    write_v6_header(w, "User Header", &uh.header, detailed)?;

    w.hex_field("Subsystem ID:", u32::from(uh.subsystem_id), " ")?;
    match uh.subsystem_name() {
        Some(name) => writeln!(w, "({})", name)?,
        None => w.write_char('\n')?,
    }

    w.hex_field("Event Data", u32::from(uh.event_data), "\n")?;

    w.write_char('\n')?;
    w.hex_field("Event Type:", u32::from(uh.event_type), "\n")?;
    match uh.event_type_description() {
        Some(desc) => w.line(desc)?,
        None => writeln!(w, "Unknown event type ({}).", uh.event_type)?,
    }

    w.write_char('\n')?;
    w.hex_field("Event Severity:", u32::from(uh.event_severity), "\n")?;
    match uh.severity_description() {
        Some(desc) => w.line(desc)?,
        None => writeln!(w, "Unknown event severity ({}).", uh.event_severity)?,
    }

    w.write_char('\n')?;
    w.hex_field("Action Flag:", u32::from(uh.action.bits()), " ")?;
    match uh.action_description() {
        Some(desc) => w.line(&desc)?,
        None => w.write_char('\n')?,
    }

    w.write_char('\n')
}

fn write_v6_epow(w: &mut TextWriter, epow: &V6Epow, detailed: bool) -> fmt::Result {
    write_v6_header(w, "EPOW Warning", &epow.header, detailed)?;

    w.hex_pair(
        ("Sensor Value:", u32::from(epow.sensor_value)),
        ("Action Code:", u32::from(epow.action_code)),
    )?;
    w.hex_field("EPOW Event:", u32::from(epow.event_modifier), "")?;
    match epow.event_modifier_description() {
        Some(desc) => writeln!(w, " - {}", desc)?,
        None => w.write_char('\n')?,
    }

    w.write_str("Platform specific reason code:")?;
    w.raw_data(&epow.reason_code)?;
    w.write_char('\n')
}

const EPOW_CAUSE_MESSAGES: FlagMessages<EpowCauses> = &[
    (EpowCauses::POWER_FAULT, "EPOW caused by a power fault."),
    (EpowCauses::FAN, "EPOW caused by fan failure."),
    (
        EpowCauses::TEMP,
        "EPOW caused by over-temperature condition.",
    ),
    (
        EpowCauses::REDUNDANCY,
        "EPOW warning due to loss of redundancy.",
    ),
    (
        EpowCauses::CUOD,
        "EPOW warning due to CUoD Entitlement Exceeded.",
    ),
];

const EPOW_POWER_FAULT_MESSAGES: FlagMessages<EpowPowerFaults> = &[
    (EpowPowerFaults::GENERAL, "EPOW general power fault."),
    (
        EpowPowerFaults::POWER_LOSS,
        "EPOW power fault due to loss of power source.",
    ),
    (
        EpowPowerFaults::POWER_SUPPLY,
        "EPOW power fault due to internal power supply failure.",
    ),
    (
        EpowPowerFaults::POWER_SWITCH,
        "EPOW power fault due to activation of power switch.",
    ),
];

fn write_legacy_epow(w: &mut TextWriter, epow: &LegacyEpow) -> fmt::Result {
    w.title("EPOW Warning")?;
    w.hex_field("EPOW Sensor Value:", epow.sensor_value, "\n")?;

    if epow.event_version >= 3 {
        if epow.causes.contains(EpowCauses::SENSOR) {
            w.line("EPOW detected by a sensor")?;
            w.hex_pair(
                ("Sensor Token:", epow.sensor_token),
                ("Sensor Index:", epow.sensor_index),
            )?;
            w.hex_pair(
                ("Sensor Value:", epow.sensor_value2),
                ("Sensor Status:", epow.sensor_status),
            )?;
        }
        flag_lines(w, epow.causes, EPOW_CAUSE_MESSAGES)?;
        flag_lines(w, epow.power_faults, EPOW_POWER_FAULT_MESSAGES)?;
    }

    if epow.event_version == 4 && epow.power_faults.contains(EpowPowerFaults::BATTERY) {
        w.line("EPOW power fault due to internal battery failure.")?;
    }

    w.write_char('\n')
}

fn write_v6_io(w: &mut TextWriter, io: &V6Io, detailed: bool) -> fmt::Result {
    write_v6_header(w, "I/O Event Section", &io.header, detailed)?;

    w.hex_field("Event Type:", u32::from(io.event_type), "    ")?;
    match io.event_type {
        0x01 | 0x02 => writeln!(w, " - {}.", io.event_type_name())?,
        _ => writeln!(w, " - {} ({:x}).", io.event_type_name(), io.event_type)?,
    }

    w.hex_field("Error/Event Scope:", u32::from(io.scope), "    ")?;
    writeln!(w, " - {}.", io.scope_name())?;

    w.hex_field("I/O Event Subtype:", u32::from(io.subtype), "    ")?;
    writeln!(w, " - {}.", io.subtype_name())?;

    w.hex_field("DRC Index:", io.drc_index, "    ")?;
    if io.has_rpc_data() {
        w.hex_field("RPC Field Length:", u32::from(io.rpc_length), "\n")?;
        if !io.rpc_data.is_empty() {
            w.raw_data(&io.rpc_data)?;
        }
    } else {
        w.write_char('\n')?;
    }

    w.write_char('\n')
}

const IO_BUS_MESSAGES: FlagMessages<IoBusErrors> = &[
    (IoBusErrors::BUS_ADDR_PARITY, "I/O bus address parity."),
    (IoBusErrors::BUS_DATA_PARITY, "I/O bus data parity."),
    (IoBusErrors::BUS_TIMEOUT, "I/O bus timeout, access or other."),
    (IoBusErrors::BRIDGE_INTERNAL, "I/O bus bridge/device internal."),
    (
        IoBusErrors::NON_PCI,
        "Signaling IOA is a PCI to non-PCI bridge (e.g. ISA).",
    ),
    (
        IoBusErrors::MEZZANINE_ADDR_PARITY,
        "Mezzanine/System bus address parity.",
    ),
    (
        IoBusErrors::MEZZANINE_DATA_PARITY,
        "Mezzanine/System bus data parity.",
    ),
    (
        IoBusErrors::MEZZANINE_TIMEOUT,
        "Mezzanine/System bus timeout, transfer or protocol.",
    ),
];

const IO_BRIDGE_MESSAGES: FlagMessages<IoBridgeErrors> = &[
    (
        IoBridgeErrors::BRIDGE_VIA_SYSBUS,
        "Bridge is connected to system bus.",
    ),
    (
        IoBridgeErrors::BRIDGE_VIA_MEZZANINE,
        "Bridge is connected to memory controller via mezzanine bus.",
    ),
];

const IO_BRIDGE_V3_MESSAGES: FlagMessages<IoBridgeErrors> = &[
    (
        IoBridgeErrors::BRIDGE_VIA_EXPBUS,
        "Bridge is connected to I/O expansion bus.",
    ),
    (
        IoBridgeErrors::DETECTED_BY_EXPBUS,
        "Error on system bus detected by I/O expansion bus controller.",
    ),
    (
        IoBridgeErrors::EXPBUS_DATA_PARITY,
        "I/O expansion bus data error.",
    ),
    (
        IoBridgeErrors::EXPBUS_TIMEOUT,
        "I/O expansion bus timeout, access or other.",
    ),
    (
        IoBridgeErrors::EXPBUS_CONNECTION_FAILURE,
        "I/O expansion bus connection failure.",
    ),
    (
        IoBridgeErrors::EXPBUS_NOT_OPERATING,
        "I/O expansion unit not in an operating state (powered off, off-line).",
    ),
];

fn write_ioa(w: &mut TextWriter, label: &str, ioa: &PciIoa) -> fmt::Result {
    writeln!(
        w,
        "{} {:x}:{:x}.{:x}",
        label,
        ioa.busno,
        ioa.device(),
        ioa.function()
    )?;
    writeln!(
        w,
        "    vendor: {:04x}  device: {:04x}  rev: {:02x}  slot: {:x}",
        ioa.vendor_id, ioa.device_id, ioa.revision_id, ioa.slot
    )
}

fn write_legacy_io(w: &mut TextWriter, io: &LegacyIo) -> fmt::Result {
    w.title("I/O Event Section")?;

    flag_lines(w, io.bus_errors, IO_BUS_MESSAGES)?;
    flag_lines(w, io.bridge_errors, IO_BRIDGE_MESSAGES)?;
    if io.event_version >= 3 {
        flag_lines(w, io.bridge_errors, IO_BRIDGE_V3_MESSAGES)?;
    }

    write_ioa(w, "IOA Signaling the error:", &io.signalling)?;
    write_ioa(w, "IOA Sending during the error:", &io.sending)?;
    w.write_char('\n')
}

const CPU_MESSAGES: FlagMessages<CpuErrors> = &[
    (CpuErrors::INTERNAL, "Internal error (not cache)."),
    (CpuErrors::INTCACHE, "Internal cache."),
    (
        CpuErrors::EXTCACHE_PARITY,
        "External cache parity (or multi-bit).",
    ),
    (CpuErrors::EXTCACHE_ECC, "External cache ECC."),
    (CpuErrors::SYSBUS_TIMEOUT, "System bus timeout."),
    (CpuErrors::IO_TIMEOUT, "I/O timeout."),
    (CpuErrors::SYSBUS_PARITY, "System bus parity."),
    (CpuErrors::SYSBUS_PROTOCOL, "System bus protocol/transfer."),
];

fn write_cpu(w: &mut TextWriter, cpu: &CpuSection) -> fmt::Result {
    w.title("CPU Section")?;
    flag_lines(w, cpu.errors, CPU_MESSAGES)?;

    w.hex_pair(
        ("CPU id:", u32::from(cpu.id)),
        ("Failing Element:", u32::from(cpu.element)),
    )?;
    w.addr_field(
        "Failing address:",
        cpu.failing_address_hi,
        cpu.failing_address_lo,
    )?;

    if cpu.event_version >= 4 && cpu.try_reboot {
        w.line("A reboot of the system may correct the problem.")?;
    }

    w.write_char('\n')
}

const MEMORY_MESSAGES: FlagMessages<MemoryErrors> = &[
    (MemoryErrors::UNCORRECTABLE, "Uncorrectable Memory error."),
    (MemoryErrors::ECC, "ECC Correctable error."),
    (
        MemoryErrors::THRESHOLD_EXCEEDED,
        "Correctable threshold exceeded.",
    ),
    (
        MemoryErrors::CONTROL_INTERNAL,
        "Memory Controller internal error.",
    ),
    (MemoryErrors::BAD_ADDRESS, "Memory Address error."),
    (MemoryErrors::BAD_DATA, "Memory Data error."),
    (MemoryErrors::BUS, "Memory bus/switch internal error."),
    (MemoryErrors::TIMEOUT, "Memory timeout."),
];

const MEMORY_BUS_MESSAGES: FlagMessages<MemoryBusErrors> = &[
    (MemoryBusErrors::SYSBUS_PARITY, "System bus parity."),
    (MemoryBusErrors::SYSBUS_TIMEOUT, "System bus timeout."),
    (
        MemoryBusErrors::SYSBUS_PROTOCOL,
        "System bus protocol/transfer.",
    ),
    (
        MemoryBusErrors::HOSTBRIDGE_TIMEOUT,
        "I/O Host Bridge timeout.",
    ),
    (MemoryBusErrors::HOSTBRIDGE_PARITY, "I/O Host Bridge parity."),
];

const MEMORY_BUS_V3_MESSAGES: FlagMessages<MemoryBusErrors> = &[
    (MemoryBusErrors::SUPPORT, "System support function error."),
    (
        MemoryBusErrors::SYSBUS_INTERNAL,
        "System bus internal hardware/switch error.",
    ),
];

fn write_memory(w: &mut TextWriter, mem: &MemorySection) -> fmt::Result {
    w.title("Memory Section")?;

    flag_lines(w, mem.errors, MEMORY_MESSAGES)?;
    flag_lines(w, mem.bus_errors, MEMORY_BUS_MESSAGES)?;
    if mem.event_version >= 3 {
        flag_lines(w, mem.bus_errors, MEMORY_BUS_V3_MESSAGES)?;
    }

    writeln!(
        w,
        "Memory Controller that detected failure: {:x}.",
        mem.controller_detected
    )?;
    writeln!(
        w,
        "Memory Controller that faulted: {:x}.",
        mem.controller_faulted
    )?;

    w.addr_field(
        "Failing address:",
        mem.failing_address_hi,
        mem.failing_address_lo,
    )?;
    w.hex_pair(
        ("ECC syndrome bits:", u32::from(mem.ecc_syndrome)),
        ("Memory Card:", u32::from(mem.memory_card)),
    )?;
    w.hex_pair(
        ("Failing element:", u32::from(mem.element)),
        ("Sub element bits:", mem.sub_elements),
    )?;

    w.write_char('\n')
}

const POST_MESSAGES: FlagMessages<PostErrors> = &[
    (PostErrors::FIRMWARE, "Firmware Error."),
    (PostErrors::CONFIG, "Configuration Error."),
    (PostErrors::CPU, "CPU POST Error."),
    (PostErrors::MEMORY, "Memory POST Error."),
    (PostErrors::IO, "I/O Subsystem POST Error."),
    (PostErrors::KEYBOARD, "Keyboard POST Error."),
    (PostErrors::MOUSE, "Mouse POST Error."),
    (PostErrors::DISPLAY, "Display POST Error."),
];

const POST_IPL_MESSAGES: FlagMessages<PostIplErrors> = &[
    (PostIplErrors::IPL_FLOPPY, "Floppy IPL Error."),
    (
        PostIplErrors::IPL_CONTROLLER,
        "Drive Controller Error during IPL.",
    ),
    (PostIplErrors::IPL_CDROM, "CDROM IPL Error."),
    (PostIplErrors::IPL_DISK, "Disk IPL Error."),
    (PostIplErrors::IPL_NET, "Network IPL Error."),
    (PostIplErrors::IPL_OTHER, "Other (tape,flash) IPL Error."),
    (
        PostIplErrors::FIRMWARE_SELFTEST,
        "Self-test error in firmware extended diagnostics.",
    ),
];

fn write_post(w: &mut TextWriter, post: &PostSection) -> fmt::Result {
    w.title("Power-On Self Test Section")?;

    if !post.devname.is_empty() {
        w.text_field("Failing Device:", &post.devname)?;
    }
    flag_lines(w, post.errors, POST_MESSAGES)?;
    flag_lines(w, post.ipl_errors, POST_IPL_MESSAGES)?;

    let [e0, e1, e2, e3] = post.err_code;
    writeln!(w, "POST Error Code:        {:x} {:x} {:x} {:x}", e0, e1, e2, e3)?;
    let [r0, r1] = post.firmware_rev;
    writeln!(w, "Firmware Revision Code: {:x} {:x}", r0, r1)?;
    if !post.loc_code.is_empty() {
        w.text_field("Location Code:", &post.loc_code)?;
    }

    w.write_char('\n')
}

const SP_GENERAL_MESSAGES: FlagMessages<SpGeneralErrors> = &[
    (
        SpGeneralErrors::TIMEOUT,
        "Timeout on communication response from service processor.",
    ),
    (SpGeneralErrors::I2C_BUS, "I2C general bus error."),
    (
        SpGeneralErrors::I2C_SECONDARY_BUS,
        "I2C secondary bus error.",
    ),
    (
        SpGeneralErrors::MEMORY,
        "Internal service processor memory error.",
    ),
    (
        SpGeneralErrors::REGISTERS,
        "Service processor error accessing special registers.",
    ),
    (
        SpGeneralErrors::COMMUNICATION,
        "Service processor reports unknown communication error.",
    ),
    (
        SpGeneralErrors::FIRMWARE,
        "Internal service processor firmware error.",
    ),
    (
        SpGeneralErrors::HARDWARE,
        "Other internal service processor hardware error.",
    ),
];

const SP_DEVICE_MESSAGES: FlagMessages<SpDeviceErrors> = &[
    (
        SpDeviceErrors::VPD_EEPROM,
        "Service processor error accessing VPD EEPROM.",
    ),
    (
        SpDeviceErrors::OP_PANEL,
        "Service processor error accessing Operator Panel.",
    ),
    (
        SpDeviceErrors::POWER_CONTROLLER,
        "Service processor error accessing Power Controller.",
    ),
    (
        SpDeviceErrors::FAN_SENSOR,
        "Service processor error accessing Fan Sensor.",
    ),
    (
        SpDeviceErrors::THERMAL_SENSOR,
        "Service processor error accessing Thermal Sensor.",
    ),
    (
        SpDeviceErrors::VOLTAGE_SENSOR,
        "Service processor error accessing Voltage Sensor.",
    ),
];

const SP_PORT_MESSAGES: FlagMessages<SpPortErrors> = &[
    (
        SpPortErrors::SERIAL_PORT,
        "Service processor error accessing serial port.",
    ),
    (
        SpPortErrors::NVRAM,
        "Service processor detected NVRAM error.",
    ),
    (
        SpPortErrors::RTC,
        "Service processor error accessing real time clock.",
    ),
    (
        SpPortErrors::JTAG,
        "Service processor error accessing JTAG/COP.",
    ),
    (
        SpPortErrors::TOD_BATTERY,
        "Service processor or RTAS detects loss of voltage from TOD battery.",
    ),
    (
        SpPortErrors::HEARTBEAT,
        "Loss of heartbeat from Service processor.",
    ),
    (
        SpPortErrors::SURVEILLANCE,
        "Service processor detected a surveillance timeout.",
    ),
];

const SP_PCN_MESSAGES: FlagMessages<SpPcnErrors> = &[
    (
        SpPcnErrors::PCN_CONNECTION,
        "Power Control Network general connection failure.",
    ),
    (SpPcnErrors::PCN_NODE, "Power Control Network node failure."),
    (
        SpPcnErrors::PCN_ACCESS,
        "Service processor error accessing Power Control Network.",
    ),
];

fn write_service_processor(w: &mut TextWriter, sp: &ServiceProcessorSection) -> fmt::Result {
    w.title("Service Processor Section")?;

    if !sp.signature_ok() {
        w.line("This log entry may be corrupt (IBM signature malformed).")?;
    }
    flag_lines(w, sp.general, SP_GENERAL_MESSAGES)?;
    flag_lines(w, sp.devices, SP_DEVICE_MESSAGES)?;
    flag_lines(w, sp.ports, SP_PORT_MESSAGES)?;
    flag_lines(w, sp.pcn, SP_PCN_MESSAGES)?;

    if sp.sensor_token != 0 {
        w.hex_field("Sensor Token:", sp.sensor_token, "\n")?;
    }
    if sp.sensor_index != 0 {
        w.hex_field("Sensor Index:", sp.sensor_index, "\n")?;
    }

    w.write_char('\n')
}

fn write_ibm_diagnostic(w: &mut TextWriter, diag: &IbmDiagnosticSection) -> fmt::Result {
    w.title("IBM Diagnostics Section")?;
    w.hex_field("Event ID:", diag.event_id, "\n")?;
    w.write_char('\n')
}

fn write_vendor_log(w: &mut TextWriter, vendor: &VendorErrorLog) -> fmt::Result {
    w.title("Vendor Error Log Section")?;
    w.text_field("Vendor ID:", &vendor.vendor_id_str())?;

    if !vendor.vendor_data.is_empty() {
        w.write_str("Raw Vendor Error Log:\n")?;
        w.raw_data(&vendor.vendor_data)?;
    }
    w.write_char('\n')
}

fn write_dump(w: &mut TextWriter, dump: &DumpSection, detailed: bool) -> fmt::Result {
    write_v6_header(w, "Dump Locator section", &dump.header, detailed)?;

    let hex_name = dump.flags.contains(DumpFlags::HEX_FILENAME);
    w.hex_field("Dump ID:", dump.id, "    ")?;
    writeln!(
        w,
        "{:<20}{:>8}",
        "Dump Field Format:",
        if hex_name { "hex" } else { "ascii" }
    )?;
    w.text_field(
        "Dump Location:",
        if dump.on_hmc() { "HMC" } else { "Partition" },
    )?;
    w.addr_field("Dump Size:", dump.size_hi, dump.size_lo)?;

    if detailed {
        write!(
            w,
            "{:<20}{:>8}    ",
            "Dump Size Valid:",
            yes_no(dump.flags.contains(DumpFlags::SIZE_VALID))
        )?;
        w.hex_field("Dump ID Length:", u32::from(dump.id_len), "\n")?;
        if dump.id_len != 0 {
            w.write_str("Dump ID:")?;
            if hex_name {
                w.raw_data(dump.os_id_bytes())?;
            } else {
                w.line(&dump.os_id_str())?;
            }
        }
    }

    w.write_char('\n')
}

fn write_lri(w: &mut TextWriter, lri: &LriSection, detailed: bool) -> fmt::Result {
    write_v6_header(
        w,
        "Logical Resource Identification",
        &lri.header,
        detailed,
    )?;

    w.hex_field("Resource Type:", u32::from(lri.resource), " ")?;
    writeln!(w, "({})", lri.resource_name())?;

    if let Some(cpu_id) = lri.cpu_id() {
        w.hex_field("CPU ID:", cpu_id, "\n")?;
    } else if let Some(lo) = lri.mem_addr_lo() {
        w.addr_field("Logical Address:", lri.mem_addr_hi, lo)?;
    } else if let Some(drc_index) = lri.drc_index() {
        w.hex_field("DRC Index:", drc_index, "\n")?;
    } else if let Some(capacity) = lri.entitled_capacity() {
        w.hex_field("Entitled Capacity:", u32::from(capacity), "\n")?;
    }

    w.write_char('\n')
}

fn write_mtms(w: &mut TextWriter, mtms: &Mtms) -> fmt::Result {
    writeln!(w, "{:<20}{} (tttt-mmm)", "Model/Type:", mtms.model)?;
    w.text_field("Serial Number:", &mtms.serial_no)
}

fn write_machine_type(w: &mut TextWriter, mt: &MtmsSection, detailed: bool) -> fmt::Result {
    write_v6_header(w, "Machine Type", &mt.header, detailed)?;
    write_mtms(w, &mt.mtms)?;
    w.write_char('\n')
}

fn write_hotplug(w: &mut TextWriter, hp: &HotplugSection, detailed: bool) -> fmt::Result {
    write_v6_header(w, "Hotplug section", &hp.header, detailed)?;

    w.hex_field("Hotplug Type:", u32::from(hp.hotplug_type), "")?;
    writeln!(w, " ({})", hp.type_name())?;
    w.hex_field("Hotplug Action:", u32::from(hp.action), "")?;
    writeln!(w, " ({})", hp.action_name())?;
    w.hex_field("Hotplug Identifier:", u32::from(hp.identifier), "\n")?;

    match &hp.target {
        HotplugTarget::DrcName(name) => w.text_field("Hotplug drc_name:", name)?,
        HotplugTarget::DrcIndex(index) => w.hex_field("Hotplug drc_index:", *index, "\n")?,
        HotplugTarget::Count(count) => w.hex_field("Hotplug count:", *count, "\n")?,
        HotplugTarget::Unknown { raw, .. } => w.hex_field("Hotplug u1:", *raw, "\n")?,
    }

    w.write_char('\n')
}

fn write_src(w: &mut TextWriter, src: &SrcSection, detailed: bool) -> fmt::Result {
    let title = if src.is_primary() {
        "Primary SRC Section"
    } else {
        "Secondary SRC Section"
    };
    write_v6_header(w, title, &src.header, detailed)?;

    if detailed {
        w.hex_pair(
            ("SRC Version:", u32::from(src.version)),
            ("Subsections:", u32::from(src.subsections_included())),
        )?;
        w.write_char('\n')?;
    }

    w.write_str("Platform Data:\n")?;
    w.raw_data(&src.platform_data)?;
    w.write_char('\n')?;

    let codes = &src.ext_refcodes;
    w.write_str("Extended Reference Codes:\n")?;
    writeln!(
        w,
        "2: {:08x}  3: {:08x}  4: {:08x}  5: {:08x}",
        codes[0], codes[1], codes[2], codes[3]
    )?;
    writeln!(
        w,
        "6: {:08x}  7: {:08x}  8: {:08x}  9: {:08x}\n",
        codes[4], codes[5], codes[6], codes[7]
    )?;

    writeln!(w, "Primary Reference Code: \"{}\"", src.primary_refcode)?;

    if let (Some(sub), true) = (&src.subsection, detailed) {
        w.hex_pair(
            ("Sub-Section ID:", u32::from(sub.id)),
            ("Platform Data:", u32::from(sub.platform_data)),
        )?;
        w.hex_field("Length:", u32::from(sub.length), "\n")?;
    }

    w.write_char('\n')?;

    for (i, fru) in src.fru_callouts().iter().enumerate() {
        write_fru_callout(w, fru, i + 1, detailed)?;
    }
    Ok(())
}

fn write_fru_callout(
    w: &mut TextWriter,
    fru: &FruCallout,
    number: usize,
    detailed: bool,
) -> fmt::Result {
    w.title(&format!("FRU Section ({})", number))?;

    if detailed {
        w.hex_pair(
            ("Length:", u32::from(fru.length)),
            ("Call-Out Type:", u32::from(fru.callout_type)),
        )?;
        writeln!(
            w,
            "{:<20}{:<8}    {:<20}{:<8}",
            "Fru ID Included:",
            yes_no(fru.fru_id_included),
            "Fru Subscns:",
            yes_no(fru.subscn_included != 0)
        )?;
    }

    write!(w, "{:<20}{} - ", "Priority:", fru.priority)?;
    w.line(fru.priority_description().unwrap_or("Unknown priority."))?;

    if fru.loc_code_length != 0 {
        if detailed {
            w.hex_field("Loc Code Length:", u32::from(fru.loc_code_length), "\n")?;
        }
        w.text_field("Location Code:", &fru.loc_code)?;
    }

    w.write_char('\n')?;

    for sub in &fru.substructures {
        let title = match sub {
            FruSubstructure::Id(_) => "FRU ID Section",
            FruSubstructure::Pe(_) => "FRU PE Section",
            FruSubstructure::Mr(_) => "FRU MR Section",
        };
        w.title(title)?;
        write_fru_substructure_header(w, sub.header(), detailed)?;
        match sub {
            FruSubstructure::Id(id) => write_fru_id(w, id)?,
            FruSubstructure::Pe(pe) => write_fru_pe(w, pe)?,
            FruSubstructure::Mr(mr) => write_fru_mr(w, mr)?,
        }
    }
    Ok(())
}

fn write_fru_substructure_header(
    w: &mut TextWriter,
    header: &FruSubstructureHeader,
    detailed: bool,
) -> fmt::Result {
    write!(
        w,
        "{:<20}{}{}          ",
        "ID:",
        char::from(header.id[0]),
        char::from(header.id[1])
    )?;
    w.hex_field("Flags:", u32::from(header.flags), "\n")?;
    if detailed {
        w.hex_field("Length:", u32::from(header.length), "\n")?;
    }
    Ok(())
}

fn write_fru_id(w: &mut TextWriter, id: &FruId) -> fmt::Result {
    if id.component() != 0 {
        w.hex_field("Failing Component:", u32::from(id.component()), " ")?;
        match id.component_description() {
            Some(desc) => writeln!(w, "({})", desc)?,
            None => w.write_char('\n')?,
        }
    }

    let fields = [
        ("FRU Stocking Part:", &id.part_no),
        ("Procedure ID:", &id.procedure_id),
        ("CCIN:", &id.ccin),
        ("Serial Number:", &id.serial_no),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            w.text_field(label, value)?;
        }
    }

    w.write_char('\n')
}

fn write_fru_pe(w: &mut TextWriter, pe: &FruPe) -> fmt::Result {
    write_mtms(w, &pe.mtms)?;

    if !pe.name.is_empty() {
        write!(w, "{:<20}{}", "PCE Name:", pe.name)?;
    }
    w.write_str("\n\n")
}

fn write_fru_mr(w: &mut TextWriter, mr: &FruMr) -> fmt::Result {
    writeln!(
        w,
        "\nManufacturing Replaceable Unit Fields ({}):",
        mr.entries.len()
    )?;
    for entry in &mr.entries {
        writeln!(
            w,
            "{:<20}{}           {:<20}{:08x}",
            "MRU Priority:", entry.priority, "MRU ID:", entry.id
        )?;
    }

    w.write_char('\n')
}

fn write_generic(w: &mut TextWriter, generic: &GenericSection) -> fmt::Result {
    write_v6_header(w, "Unknown Section", &generic.header, true)?;
    w.write_char('\n')?;

    if !generic.data.is_empty() {
        w.write_str("Raw Section Data:\n")?;
        w.raw_data(&generic.data)?;
    }
    w.write_char('\n')
}
