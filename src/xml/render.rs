//! Writer for the network configuration document.

use super::{XmlError, NETWORK_CONFIGURATION_NS, XSD_NS, XSI_NS};
use crate::models::{NetworkSection, RawXml, VirtualNetworkSite};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};

const INDENT: usize = 2;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn write_err<E: std::fmt::Display>(e: E) -> XmlError {
    XmlError::Write(e.to_string())
}

/// Render a section as a complete `NetworkConfiguration` document.
///
/// Sections are written in the order the provider expects: `Dns`,
/// `LocalNetworkSites`, `VirtualNetworkSites`. Empty sections are left out.
pub fn render_network_configuration(section: &NetworkSection) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', INDENT);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_err)?;

    let mut root = BytesStart::new("NetworkConfiguration");
    root.push_attribute(("xmlns:xsd", XSD_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xmlns", NETWORK_CONFIGURATION_NS));
    writer.write_event(Event::Start(root)).map_err(write_err)?;
    start(&mut writer, "VirtualNetworkConfiguration")?;

    if !section.dns_servers.is_empty() {
        start(&mut writer, "Dns")?;
        start(&mut writer, "DnsServers")?;
        for dns in &section.dns_servers {
            writer
                .create_element("DnsServer")
                .with_attribute(("name", dns.name.as_str()))
                .with_attribute(("IPAddress", dns.ip_address.as_str()))
                .write_empty()
                .map_err(write_err)?;
        }
        end(&mut writer, "DnsServers")?;
        end(&mut writer, "Dns")?;
    }

    if let Some(local) = &section.local_network_sites {
        write_raw(&mut writer, local, 2)?;
    }

    if !section.virtual_network_sites.is_empty() {
        start(&mut writer, "VirtualNetworkSites")?;
        for site in &section.virtual_network_sites {
            write_site(&mut writer, site)?;
        }
        end(&mut writer, "VirtualNetworkSites")?;
    }

    end(&mut writer, "VirtualNetworkConfiguration")?;
    end(&mut writer, "NetworkConfiguration")?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(write_err)
}

fn write_site(writer: &mut XmlWriter, site: &VirtualNetworkSite) -> Result<(), XmlError> {
    let mut element = BytesStart::new("VirtualNetworkSite");
    element.push_attribute(("name", site.name.as_str()));
    if let Some(location) = &site.location {
        element.push_attribute(("Location", location.as_str()));
    }
    if let Some(affinity_group) = &site.affinity_group {
        element.push_attribute(("AffinityGroup", affinity_group.as_str()));
    }
    writer.write_event(Event::Start(element)).map_err(write_err)?;

    if !site.address_space.is_empty() {
        start(writer, "AddressSpace")?;
        for prefix in &site.address_space {
            text_element(writer, "AddressPrefix", prefix)?;
        }
        end(writer, "AddressSpace")?;
    }

    if !site.subnets.is_empty() {
        start(writer, "Subnets")?;
        for subnet in &site.subnets {
            writer
                .write_event(Event::Start(
                    BytesStart::new("Subnet").with_attributes([("name", subnet.name.as_str())]),
                ))
                .map_err(write_err)?;
            text_element(writer, "AddressPrefix", &subnet.address_prefix)?;
            for extra in &subnet.extra {
                write_raw(writer, extra, 6)?;
            }
            end(writer, "Subnet")?;
        }
        end(writer, "Subnets")?;
    }

    if !site.dns_server_refs.is_empty() {
        start(writer, "DnsServersRef")?;
        for name in &site.dns_server_refs {
            writer
                .create_element("DnsServerRef")
                .with_attribute(("name", name.as_str()))
                .write_empty()
                .map_err(write_err)?;
        }
        end(writer, "DnsServersRef")?;
    }

    for extra in &site.extra {
        write_raw(writer, extra, 4)?;
    }

    end(writer, "VirtualNetworkSite")
}

fn start(writer: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_err)
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<(), XmlError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_err)
}

fn text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<(), XmlError> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))
        .map_err(write_err)?;
    Ok(())
}

/// Copy a verbatim fragment at the given nesting depth.
fn write_raw(writer: &mut XmlWriter, raw: &RawXml, depth: usize) -> Result<(), XmlError> {
    let indent = " ".repeat(depth * INDENT);
    write!(writer.get_mut(), "\n{indent}{}", raw.as_str()).map_err(write_err)
}
