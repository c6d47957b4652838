use serde::Serialize;

/// A single capability granted to the isolated preview context.
/// 预览沙箱可授予的单项能力。
///
/// The enum is closed: top-level navigation, downloads and similar
/// capabilities are not representable and therefore never granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SandboxCapability {
    Scripts,
    SameOrigin,
    Forms,
    Popups,
    Modals,
    PointerLock,
}

impl SandboxCapability {
    pub fn token(self) -> &'static str {
        match self {
            SandboxCapability::Scripts => "allow-scripts",
            SandboxCapability::SameOrigin => "allow-same-origin",
            SandboxCapability::Forms => "allow-forms",
            SandboxCapability::Popups => "allow-popups",
            SandboxCapability::Modals => "allow-modals",
            SandboxCapability::PointerLock => "allow-pointer-lock",
        }
    }
}

/// Explicit allow-list for untrusted preview content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SandboxPolicy {
    capabilities: Vec<SandboxCapability>,
}

impl SandboxPolicy {
    /// Policy used for every markup and component preview.
    pub fn preview() -> Self {
        Self {
            capabilities: vec![
                SandboxCapability::Scripts,
                SandboxCapability::SameOrigin,
                SandboxCapability::Forms,
                SandboxCapability::Popups,
                SandboxCapability::Modals,
                SandboxCapability::PointerLock,
            ],
        }
    }

    pub fn permits(&self, capability: SandboxCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn capabilities(&self) -> &[SandboxCapability] {
        &self.capabilities
    }

    /// Value for an iframe `sandbox` attribute.
    pub fn attribute(&self) -> String {
        self.capabilities
            .iter()
            .map(|c| c.token())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::preview()
    }
}
