//! Event based reader for the network configuration document.
//!
//! Element names are matched on their local name, so the default namespace
//! used by the provider (or any prefix) does not matter. Blocks that are
//! passed through untouched are re-emitted event by event under their local
//! names, without namespace declarations, so they land in the default
//! namespace of the rendered document.

use super::XmlError;
use crate::models::{DnsServer, NetworkSection, RawXml, Subnet, VirtualNetworkSite};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Parse a `NetworkConfiguration` document.
///
/// An empty (or whitespace only) document is an empty section, which is
/// what the provider hands back for a subscription without networks.
///
/// # Returns
/// * `Ok(NetworkSection)` - DNS servers, local network sites and VNet sites
/// * `Err(XmlError)` - If the document is not well formed or has no root
pub fn parse_network_configuration(input: &str) -> Result<NetworkSection, XmlError> {
    let mut section = NetworkSection::default();
    if input.trim().is_empty() {
        return Ok(section);
    }

    let mut parser = Parser::new(input);
    let mut found_root = false;
    loop {
        match parser.next()? {
            Event::Start(e) if local_name(&e) == "NetworkConfiguration" => {
                found_root = true;
                parser.root(&mut section)?;
            }
            Event::Empty(e) if local_name(&e) == "NetworkConfiguration" => found_root = true,
            Event::Start(_) => {
                parser.skip("document")?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !found_root {
        return Err(XmlError::MissingRoot);
    }
    log::debug!(
        "parsed network configuration: {} dns, {} vnets, local sites: {}",
        section.dns_servers.len(),
        section.virtual_network_sites.len(),
        section.local_network_sites.is_some()
    );
    Ok(section)
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Parser<'a> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);
        Parser { reader }
    }

    fn malformed<E: std::fmt::Display>(&self, e: E) -> XmlError {
        XmlError::Malformed {
            position: self.reader.buffer_position() as u64,
            message: e.to_string(),
        }
    }

    fn next(&mut self) -> Result<Event<'a>, XmlError> {
        self.reader.read_event().map_err(|e| self.malformed(e))
    }

    /// Copy the element whose start tag was just read, up to and including
    /// its end tag. Returns the fragment and the number of direct children.
    fn capture(&mut self, first: &BytesStart<'a>) -> Result<(RawXml, usize), XmlError> {
        let mut writer = Writer::new(Vec::new());
        write_captured(&mut writer, Event::Start(self.unprefixed(first)?))?;
        let mut depth = 0usize;
        let mut children = 0usize;
        loop {
            match self.next()? {
                Event::Start(e) => {
                    if depth == 0 {
                        children += 1;
                    }
                    depth += 1;
                    write_captured(&mut writer, Event::Start(self.unprefixed(&e)?))?;
                }
                Event::Empty(e) => {
                    if depth == 0 {
                        children += 1;
                    }
                    write_captured(&mut writer, Event::Empty(self.unprefixed(&e)?))?;
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    write_captured(&mut writer, Event::End(BytesEnd::new(name)))?;
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                event @ (Event::Text(_) | Event::CData(_) | Event::Comment(_)) => {
                    write_captured(&mut writer, event)?;
                }
                Event::Eof => return Err(XmlError::UnexpectedEof(local_name(first))),
                _ => {}
            }
        }
        let text = String::from_utf8(writer.into_inner()).map_err(|e| self.malformed(e))?;
        Ok((RawXml(text), children))
    }

    /// Copy of a self-closing element.
    fn capture_empty(&self, e: &BytesStart<'a>) -> Result<RawXml, XmlError> {
        let mut writer = Writer::new(Vec::new());
        write_captured(&mut writer, Event::Empty(self.unprefixed(e)?))?;
        let text = String::from_utf8(writer.into_inner()).map_err(|e| self.malformed(e))?;
        Ok(RawXml(text))
    }

    /// Start tag under its local name, without namespace declarations.
    /// `xsi:` and `xsd:` attributes keep their prefix, the rendered root
    /// declares both.
    fn unprefixed(&self, e: &BytesStart<'a>) -> Result<BytesStart<'static>, XmlError> {
        let mut out = BytesStart::new(local_name(e));
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.malformed(err))?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let key = if key.starts_with(b"xsi:") || key.starts_with(b"xsd:") {
                key
            } else {
                attr.key.local_name().into_inner()
            };
            out.push_attribute((key, attr.value.as_ref()));
        }
        Ok(out)
    }

    /// Consume events up to and including the end tag of the element whose
    /// start tag was just read. Returns the number of direct children.
    fn skip(&mut self, element: &str) -> Result<usize, XmlError> {
        let mut depth = 0usize;
        let mut children = 0usize;
        loop {
            match self.next()? {
                Event::Start(_) => {
                    if depth == 0 {
                        children += 1;
                    }
                    depth += 1;
                }
                Event::Empty(_) if depth == 0 => children += 1,
                Event::End(_) => {
                    if depth == 0 {
                        return Ok(children);
                    }
                    depth -= 1;
                }
                Event::Eof => return Err(XmlError::UnexpectedEof(element.to_string())),
                _ => {}
            }
        }
    }

    /// Concatenated text content up to the end tag.
    fn text(&mut self, element: &str) -> Result<String, XmlError> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => {
                    let unescaped = t.unescape().map_err(|e| self.malformed(e))?;
                    text.push_str(&unescaped);
                }
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(_) => {
                    self.skip(element)?;
                }
                Event::End(_) => return Ok(text.trim().to_string()),
                Event::Eof => return Err(XmlError::UnexpectedEof(element.to_string())),
                _ => {}
            }
        }
    }

    fn attribute(&self, e: &BytesStart<'a>, name: &str) -> Result<Option<String>, XmlError> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.malformed(err))?;
            if attr.key.local_name().as_ref() == name.as_bytes() {
                let value = attr.unescape_value().map_err(|err| self.malformed(err))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn name_attribute(&self, e: &BytesStart<'a>) -> Result<String, XmlError> {
        Ok(self.attribute(e, "name")?.unwrap_or_default())
    }

    fn root(&mut self, section: &mut NetworkSection) -> Result<(), XmlError> {
        loop {
            match self.next()? {
                Event::Start(e) if local_name(&e) == "VirtualNetworkConfiguration" => {
                    self.virtual_network_configuration(section)?
                }
                Event::Start(_) => {
                    self.skip("NetworkConfiguration")?;
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(XmlError::UnexpectedEof("NetworkConfiguration".into())),
                _ => {}
            }
        }
    }

    fn virtual_network_configuration(
        &mut self,
        section: &mut NetworkSection,
    ) -> Result<(), XmlError> {
        loop {
            match self.next()? {
                Event::Start(e) => match local_name(&e).as_str() {
                    "Dns" => self.dns(section)?,
                    "VirtualNetworkSites" => self.sites(section)?,
                    "LocalNetworkSites" => {
                        let (block, children) = self.capture(&e)?;
                        if children > 0 {
                            section.local_network_sites = Some(block);
                        }
                    }
                    other => {
                        log::debug!("ignoring <{other}> in VirtualNetworkConfiguration");
                        self.skip(other)?;
                    }
                },
                Event::End(_) => return Ok(()),
                Event::Eof => {
                    return Err(XmlError::UnexpectedEof(
                        "VirtualNetworkConfiguration".into(),
                    ))
                }
                _ => {}
            }
        }
    }

    fn dns(&mut self, section: &mut NetworkSection) -> Result<(), XmlError> {
        loop {
            match self.next()? {
                Event::Start(e) if local_name(&e) == "DnsServers" => {
                    self.dns_servers(section)?
                }
                Event::Start(_) => {
                    self.skip("Dns")?;
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(XmlError::UnexpectedEof("Dns".into())),
                _ => {}
            }
        }
    }

    fn dns_servers(&mut self, section: &mut NetworkSection) -> Result<(), XmlError> {
        loop {
            match self.next()? {
                Event::Empty(e) if local_name(&e) == "DnsServer" => {
                    section.dns_servers.push(self.dns_server(&e)?);
                }
                Event::Start(e) if local_name(&e) == "DnsServer" => {
                    section.dns_servers.push(self.dns_server(&e)?);
                    self.skip("DnsServer")?;
                }
                Event::Start(_) => {
                    self.skip("DnsServers")?;
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(XmlError::UnexpectedEof("DnsServers".into())),
                _ => {}
            }
        }
    }

    fn dns_server(&self, e: &BytesStart<'a>) -> Result<DnsServer, XmlError> {
        Ok(DnsServer {
            name: self.name_attribute(e)?,
            ip_address: self.attribute(e, "IPAddress")?.unwrap_or_default(),
        })
    }

    fn sites(&mut self, section: &mut NetworkSection) -> Result<(), XmlError> {
        loop {
            match self.next()? {
                Event::Start(e) if local_name(&e) == "VirtualNetworkSite" => {
                    let mut site = self.site_header(&e)?;
                    self.site_body(&mut site)?;
                    section.virtual_network_sites.push(site);
                }
                Event::Empty(e) if local_name(&e) == "VirtualNetworkSite" => {
                    section.virtual_network_sites.push(self.site_header(&e)?);
                }
                Event::Start(_) => {
                    self.skip("VirtualNetworkSites")?;
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(XmlError::UnexpectedEof("VirtualNetworkSites".into())),
                _ => {}
            }
        }
    }

    fn site_header(&self, e: &BytesStart<'a>) -> Result<VirtualNetworkSite, XmlError> {
        Ok(VirtualNetworkSite {
            name: self.name_attribute(e)?,
            location: self.attribute(e, "Location")?,
            affinity_group: self.attribute(e, "AffinityGroup")?,
            ..Default::default()
        })
    }

    fn site_body(&mut self, site: &mut VirtualNetworkSite) -> Result<(), XmlError> {
        loop {
            match self.next()? {
                Event::Start(e) => match local_name(&e).as_str() {
                    "AddressSpace" => site.address_space.extend(self.address_prefixes()?),
                    "Subnets" => self.subnets(site)?,
                    "DnsServersRef" => self.dns_server_refs(site)?,
                    _ => site.extra.push(self.capture(&e)?.0),
                },
                Event::Empty(e) => match local_name(&e).as_str() {
                    "AddressSpace" | "Subnets" | "DnsServersRef" => {}
                    _ => site.extra.push(self.capture_empty(&e)?),
                },
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(XmlError::UnexpectedEof("VirtualNetworkSite".into())),
                _ => {}
            }
        }
    }

    fn address_prefixes(&mut self) -> Result<Vec<String>, XmlError> {
        let mut prefixes = Vec::new();
        loop {
            match self.next()? {
                Event::Start(e) if local_name(&e) == "AddressPrefix" => {
                    prefixes.push(self.text("AddressPrefix")?);
                }
                Event::Start(_) => {
                    self.skip("AddressSpace")?;
                }
                Event::End(_) => return Ok(prefixes),
                Event::Eof => return Err(XmlError::UnexpectedEof("AddressSpace".into())),
                _ => {}
            }
        }
    }

    fn subnets(&mut self, site: &mut VirtualNetworkSite) -> Result<(), XmlError> {
        loop {
            match self.next()? {
                Event::Start(e) if local_name(&e) == "Subnet" => {
                    let mut subnet = Subnet::new(&self.name_attribute(&e)?, "");
                    self.subnet_body(&mut subnet)?;
                    site.subnets.push(subnet);
                }
                Event::Empty(e) if local_name(&e) == "Subnet" => {
                    site.subnets.push(Subnet::new(&self.name_attribute(&e)?, ""));
                }
                Event::Start(_) => {
                    self.skip("Subnets")?;
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(XmlError::UnexpectedEof("Subnets".into())),
                _ => {}
            }
        }
    }

    fn subnet_body(&mut self, subnet: &mut Subnet) -> Result<(), XmlError> {
        loop {
            match self.next()? {
                Event::Start(e) if local_name(&e) == "AddressPrefix" => {
                    subnet.address_prefix = self.text("AddressPrefix")?;
                }
                Event::Start(e) => {
                    log::debug!("keeping <{}> in subnet {}", local_name(&e), subnet.name);
                    subnet.extra.push(self.capture(&e)?.0);
                }
                Event::Empty(e) => {
                    log::debug!("keeping <{}> in subnet {}", local_name(&e), subnet.name);
                    subnet.extra.push(self.capture_empty(&e)?);
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(XmlError::UnexpectedEof("Subnet".into())),
                _ => {}
            }
        }
    }

    fn dns_server_refs(&mut self, site: &mut VirtualNetworkSite) -> Result<(), XmlError> {
        loop {
            match self.next()? {
                Event::Empty(e) if local_name(&e) == "DnsServerRef" => {
                    site.dns_server_refs.push(self.name_attribute(&e)?);
                }
                Event::Start(e) if local_name(&e) == "DnsServerRef" => {
                    site.dns_server_refs.push(self.name_attribute(&e)?);
                    self.skip("DnsServerRef")?;
                }
                Event::Start(_) => {
                    self.skip("DnsServersRef")?;
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(XmlError::UnexpectedEof("DnsServersRef".into())),
                _ => {}
            }
        }
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn write_captured(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_test_data(name: &str) -> String {
        std::fs::read_to_string(format!("src/tests/test_data/{name}"))
            .expect("Error reading test data")
    }

    #[test]
    fn test_parse_existing_config() {
        let section = parse_network_configuration(&read_test_data("netcfg_existing_01.xml"))
            .expect("Error parsing network config");
        assert_eq!(section.dns_servers.len(), 2);
        assert_eq!(section.dns_servers[0], DnsServer::new("dc1", "10.0.0.4"));
        assert_eq!(section.dns_servers[1], DnsServer::new("dc2", "10.0.0.5"));
        assert_eq!(section.virtual_network_sites.len(), 1);

        let corp = &section.virtual_network_sites[0];
        assert_eq!(corp.name, "corp");
        assert_eq!(corp.location.as_deref(), Some("West Europe"));
        assert_eq!(corp.address_space, vec!["10.1.0.0/16"]);
        assert_eq!(corp.subnets, vec![Subnet::new("frontend", "10.1.1.0/24")]);
        assert_eq!(corp.dns_server_refs, vec!["dc1", "dc2"]);
        assert!(section.local_network_sites.is_none());
    }

    #[test]
    fn test_parse_local_sites_verbatim() {
        let section = parse_network_configuration(&read_test_data("netcfg_existing_02.xml"))
            .expect("Error parsing network config");
        let local = section
            .local_network_sites
            .as_ref()
            .expect("LocalNetworkSites should be captured");
        assert!(local.as_str().starts_with("<LocalNetworkSites>"));
        assert!(local.as_str().ends_with("</LocalNetworkSites>"));
        assert!(local.as_str().contains(r#"<LocalNetworkSite name="onprem">"#));
        assert!(local.as_str().contains("<VPNGatewayAddress>203.0.113.10</VPNGatewayAddress>"));

        let hub = section.site("hub").expect("hub site");
        assert_eq!(hub.affinity_group.as_deref(), Some("hub-ag"));
        assert_eq!(hub.location, None);
        assert_eq!(hub.extra.len(), 1);
        assert!(hub.extra[0].as_str().starts_with("<Gateway>"));
        assert!(hub.extra[0].as_str().contains(r#"<LocalNetworkSiteRef name="onprem">"#));
    }

    #[test]
    fn test_parse_empty_local_sites_is_none() {
        let xml = r#"<NetworkConfiguration xmlns="http://schemas.microsoft.com/ServiceHosting/2011/07/NetworkConfiguration">
  <VirtualNetworkConfiguration>
    <LocalNetworkSites>
    </LocalNetworkSites>
    <VirtualNetworkSites />
  </VirtualNetworkConfiguration>
</NetworkConfiguration>"#;
        let section = parse_network_configuration(xml).expect("Error parsing");
        assert!(section.is_empty());
    }

    #[test]
    fn test_parse_empty_document() {
        let section = parse_network_configuration("  \n").expect("Error parsing");
        assert!(section.is_empty());
    }

    #[test]
    fn test_parse_missing_root() {
        let result = parse_network_configuration("<Other><Thing/></Other>");
        assert!(matches!(result, Err(XmlError::MissingRoot)));
    }

    #[test]
    fn test_parse_malformed() {
        let xml = "<NetworkConfiguration><VirtualNetworkConfiguration></Dns></NetworkConfiguration>";
        assert!(parse_network_configuration(xml).is_err());
    }

    #[test]
    fn test_parse_truncated() {
        let xml = "<NetworkConfiguration><VirtualNetworkConfiguration><Dns>";
        assert!(parse_network_configuration(xml).is_err());
    }

    #[test]
    fn test_parse_prefixed_namespace() {
        let xml = r#"<nc:NetworkConfiguration xmlns:nc="http://schemas.microsoft.com/ServiceHosting/2011/07/NetworkConfiguration">
  <nc:VirtualNetworkConfiguration>
    <nc:Dns><nc:DnsServers><nc:DnsServer name="dc9" IPAddress="10.9.0.4"/></nc:DnsServers></nc:Dns>
  </nc:VirtualNetworkConfiguration>
</nc:NetworkConfiguration>"#;
        let section = parse_network_configuration(xml).expect("Error parsing");
        assert_eq!(section.dns_servers, vec![DnsServer::new("dc9", "10.9.0.4")]);
    }

    #[test]
    fn test_parse_prefixed_blocks_lose_prefix() {
        let xml = r#"<nc:NetworkConfiguration xmlns:nc="http://schemas.microsoft.com/ServiceHosting/2011/07/NetworkConfiguration">
  <nc:VirtualNetworkConfiguration>
    <nc:LocalNetworkSites>
      <nc:LocalNetworkSite nc:name="onprem"><nc:VPNGatewayAddress>203.0.113.10</nc:VPNGatewayAddress></nc:LocalNetworkSite>
    </nc:LocalNetworkSites>
    <nc:VirtualNetworkSites>
      <nc:VirtualNetworkSite name="hub" AffinityGroup="hub-ag">
        <nc:Gateway><nc:ConnectionsToLocalNetwork/></nc:Gateway>
      </nc:VirtualNetworkSite>
    </nc:VirtualNetworkSites>
  </nc:VirtualNetworkConfiguration>
</nc:NetworkConfiguration>"#;
        let section = parse_network_configuration(xml).expect("Error parsing");
        let local = section.local_network_sites.as_ref().expect("local sites");
        assert_eq!(
            local.as_str(),
            r#"<LocalNetworkSites><LocalNetworkSite name="onprem"><VPNGatewayAddress>203.0.113.10</VPNGatewayAddress></LocalNetworkSite></LocalNetworkSites>"#
        );
        let hub = section.site("hub").expect("hub site");
        assert_eq!(hub.extra, vec![RawXml("<Gateway><ConnectionsToLocalNetwork/></Gateway>".to_string())]);
    }

    #[test]
    fn test_parse_keeps_unknown_subnet_children() {
        let xml = r#"<NetworkConfiguration xmlns="http://schemas.microsoft.com/ServiceHosting/2011/07/NetworkConfiguration">
  <VirtualNetworkConfiguration>
    <VirtualNetworkSites>
      <VirtualNetworkSite name="corp" Location="West Europe">
        <Subnets>
          <Subnet name="frontend">
            <AddressPrefix>10.1.1.0/24</AddressPrefix>
            <NetworkSecurityGroup name="web-nsg" />
          </Subnet>
        </Subnets>
      </VirtualNetworkSite>
    </VirtualNetworkSites>
  </VirtualNetworkConfiguration>
</NetworkConfiguration>"#;
        let section = parse_network_configuration(xml).expect("Error parsing");
        let subnet = &section.site("corp").expect("corp site").subnets[0];
        assert_eq!(subnet.address_prefix, "10.1.1.0/24");
        assert_eq!(
            subnet.extra,
            vec![RawXml(r#"<NetworkSecurityGroup name="web-nsg"/>"#.to_string())]
        );
    }
}
