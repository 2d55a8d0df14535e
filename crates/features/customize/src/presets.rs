//! Built-in default themes.

use folio_domain::settings::SettingsDocument;

/// The "Neon Pulse" theme the site ships with.
///
/// Used as the defaults table when planning, so a fresh install with no stored customization
/// still renders the themed page.
#[must_use]
pub fn neon_pulse() -> SettingsDocument {
    SettingsDocument::new()
        .with(
            "customHeadHtml",
            r##"<meta name="theme-color" content="#090611" />
<meta name="color-scheme" content="dark" />"##,
        )
        .with(
            "customHeadCss",
            r#":root{--neon-cyan:#00e5ff;--neon-pink:#ff2bd6;--neon-purple:#7a5cff;--bg-deep:#070611;}
body{background:radial-gradient(1200px 600px at 12% -10%,rgba(0,229,255,.12),transparent 60%),radial-gradient(900px 500px at 100% 0,rgba(255,43,214,.14),transparent 55%),var(--bg-deep);}
::selection{background:rgba(0,229,255,.35);color:#fff;}"#,
        )
        .with(
            "customHeadJs",
            r#"window.__CYBER_THEME__={name:'NeonPulse',version:'1.0.0'};"#,
        )
        .with(
            "customBodyHtml",
            r#"<div class="global-neon-ribbon" aria-hidden="true"></div>
<div class="global-cyber-noise" aria-hidden="true"></div>"#,
        )
        .with(
            "customBodyCss",
            r#".global-neon-ribbon{position:fixed;inset:0;pointer-events:none;z-index:6;background:linear-gradient(120deg,transparent 0%,rgba(0,229,255,.05) 35%,rgba(122,92,255,.06) 55%,transparent 100%);mix-blend-mode:screen;animation:ribbonShift 16s linear infinite;}
.global-cyber-noise{position:fixed;inset:0;pointer-events:none;z-index:5;opacity:.03;background-image:url("data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='120' height='120' viewBox='0 0 120 120'%3E%3Cfilter id='n'%3E%3CfeTurbulence type='fractalNoise' baseFrequency='.9' numOctaves='2'/%3E%3C/filter%3E%3Crect width='120' height='120' filter='url(%23n)' opacity='.8'/%3E%3C/svg%3E");}
@keyframes ribbonShift{0%{transform:translateX(-6%)}50%{transform:translateX(6%)}100%{transform:translateX(-6%)}}"#,
        )
        .with(
            "customBodyJs",
            r#"(function(){const k='cyber-last-visit';localStorage.setItem(k,new Date().toISOString());})();"#,
        )
        .with(
            "customFooterHtml",
            r#"<div class="global-footer-note">NEON ARCHIVE · PERSONAL SIGNAL ONLINE</div>"#,
        )
        .with(
            "customFooterCss",
            r#".global-footer-note{margin:1rem auto 1.6rem;text-align:center;letter-spacing:.18em;font-size:.7rem;color:rgba(200,220,255,.72);text-transform:uppercase;}"#,
        )
        .with(
            "customFooterJs",
            r#"console.log('[CyberPreset] footer hook ready');"#,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Slot;

    #[test]
    fn test_preset_covers_every_slot() {
        let preset = neon_pulse();
        for slot in Slot::ALL {
            assert!(preset.text(slot.settings_key()).is_some(), "{} missing", slot.settings_key());
        }
    }
}
