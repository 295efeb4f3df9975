//! Network configuration through the classic Azure PowerShell cmdlets.

use super::cli;
use super::NetworkConfigClient;
use std::error::Error;
use std::path::Path;

/// Runs `Get-AzureVNetConfig` / `Set-AzureVNetConfig` in a PowerShell host.
///
/// The PowerShell session must already be signed in to the subscription.
#[derive(Debug, Clone)]
pub struct PowerShellClient {
    shell: String,
}

impl PowerShellClient {
    pub fn new(shell: &str) -> PowerShellClient {
        PowerShellClient {
            shell: shell.to_string(),
        }
    }

    fn get_command(&self) -> String {
        format!(
            "{} -NoProfile -NonInteractive -Command '(Get-AzureVNetConfig).XMLConfiguration'",
            self.shell
        )
    }

    /// The path goes into a single-quoted PowerShell string, where a quote
    /// is written twice.
    fn set_command(&self, path: &Path) -> String {
        format!(
            "{} -NoProfile -NonInteractive -Command \"Set-AzureVNetConfig -ConfigurationPath '{}'\"",
            self.shell,
            path.display().to_string().replace('\'', "''")
        )
    }
}

impl Default for PowerShellClient {
    fn default() -> Self {
        PowerShellClient::new("pwsh")
    }
}

impl NetworkConfigClient for PowerShellClient {
    fn fetch_configuration(&self) -> Result<Option<String>, Box<dyn Error>> {
        let output = cli::run(&self.get_command())?;
        if output.trim().is_empty() {
            log::warn!("Get-AzureVNetConfig returned no configuration");
            return Ok(None);
        }
        log::info!("Got network configuration, {} bytes", output.len());
        Ok(Some(output))
    }

    fn apply_configuration(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let output = cli::run(&self.set_command(path))?;
        log::info!("Set-AzureVNetConfig: {}", output.trim());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_command() {
        let client = PowerShellClient::default();
        assert_eq!(
            client.get_command(),
            "pwsh -NoProfile -NonInteractive -Command '(Get-AzureVNetConfig).XMLConfiguration'"
        );
    }

    #[test]
    fn test_set_command_quotes_path() {
        let client = PowerShellClient::new("powershell.exe");
        let cmd = client.set_command(Path::new("C:/temp/net config.xml"));
        assert_eq!(
            cmd,
            "powershell.exe -NoProfile -NonInteractive -Command \"Set-AzureVNetConfig -ConfigurationPath 'C:/temp/net config.xml'\""
        );
    }

    #[test]
    fn test_set_command_escapes_single_quote() {
        let client = PowerShellClient::new("pwsh");
        let cmd = client.set_command(Path::new("C:/temp/o'neil.xml"));
        assert_eq!(
            cmd,
            "pwsh -NoProfile -NonInteractive -Command \"Set-AzureVNetConfig -ConfigurationPath 'C:/temp/o''neil.xml'\""
        );
    }

    #[test]
    fn test_missing_shell_is_an_error() {
        let client = PowerShellClient::new("no-such-powershell-binary");
        assert!(client.fetch_configuration().is_err());
    }
}
