//! Text-to-speech through the operating system's speech command.
//!
//! | Platform | Command                               |
//! |----------|---------------------------------------|
//! | macOS    | `say`                                 |
//! | Linux    | `espeak-ng` (or `espeak`)             |
//! | Windows  | `powershell` with `System.Speech`     |
//!
//! Text is always written to the child's stdin so it never has to be
//! quoted on a command line.  A watcher thread reports when the command
//! exits and whether it played to the end; a cancelled utterance never
//! reports.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::voice::{UtteranceSettings, Voice};
use super::SynthesisError;

pub type EndCallback = Box<dyn FnOnce() + Send>;

/// Called once when playback stops without being cancelled.  The flag is
/// `true` when the utterance played to the end.
pub type DoneCallback = Box<dyn FnOnce(bool) + Send>;

/// Backend for speaking text aloud.
pub trait SpeechSynthesizer: Send {
    fn is_available(&self) -> bool;

    /// Installed voices; empty when the backend cannot list them.
    fn voices(&self) -> Vec<Voice>;

    /// Start speaking `text`.  `on_done` runs once when playback stops on
    /// its own (finished or failed), and never if it is cancelled.
    fn speak(
        &mut self,
        text: &str,
        voice: Option<&Voice>,
        settings: UtteranceSettings,
        on_done: DoneCallback,
    ) -> Result<(), SynthesisError>;

    /// Stop the current utterance.  Safe when idle.
    fn cancel(&mut self);
}

// ---------------------------------------------------------------------------
// TtsBackend
// ---------------------------------------------------------------------------

/// Which speech command is in use, with its resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtsBackend {
    Say(PathBuf),
    Espeak(PathBuf),
    PowerShell(PathBuf),
}

/// A fully-resolved command: program, arguments and the text for stdin.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub stdin: String,
}

impl Invocation {
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl TtsBackend {
    /// Resolve the backend: the configured command if given, otherwise the
    /// platform default found on `PATH`.
    pub fn detect(override_command: Option<&str>) -> Option<Self> {
        if let Some(cmd) = override_command.filter(|c| !c.trim().is_empty()) {
            return find_program(cmd.trim()).map(Self::from_program);
        }

        let candidates: &[&str] = if cfg!(target_os = "macos") {
            &["say"]
        } else if cfg!(windows) {
            &["powershell", "pwsh"]
        } else {
            &["espeak-ng", "espeak"]
        };
        candidates.iter().find_map(|c| find_program(c)).map(Self::from_program)
    }

    /// Infer the argument style from the program's file name.  Unknown
    /// programs are driven with espeak-style flags.
    pub fn from_program(path: PathBuf) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match stem.as_str() {
            "say" => TtsBackend::Say(path),
            "powershell" | "pwsh" => TtsBackend::PowerShell(path),
            _ => TtsBackend::Espeak(path),
        }
    }

    pub fn program(&self) -> &Path {
        match self {
            TtsBackend::Say(p) | TtsBackend::Espeak(p) | TtsBackend::PowerShell(p) => p,
        }
    }

    /// Build the command that speaks `text`.
    pub fn invocation(
        &self,
        text: &str,
        voice: Option<&Voice>,
        settings: UtteranceSettings,
    ) -> Invocation {
        let program = self.program().to_path_buf();
        match self {
            TtsBackend::Say(_) => {
                // say has no pitch flag; volume is an embedded command.
                let mut args = Vec::new();
                if let Some(v) = voice {
                    args.extend(["-v".to_string(), v.id.clone()]);
                }
                args.extend(["-r".to_string(), words_per_minute(settings.rate).to_string()]);
                Invocation {
                    program,
                    args,
                    stdin: format!("[[volm {:.2}]] {text}", settings.volume.clamp(0.0, 1.0)),
                }
            }
            TtsBackend::Espeak(_) => {
                let mut args = Vec::new();
                if let Some(v) = voice {
                    args.extend(["-v".to_string(), v.id.clone()]);
                }
                args.extend([
                    "-s".to_string(),
                    words_per_minute(settings.rate).to_string(),
                    "-p".to_string(),
                    ((settings.pitch * 50.0).round().clamp(0.0, 99.0) as u32).to_string(),
                    "-a".to_string(),
                    ((settings.volume * 100.0).round().clamp(0.0, 200.0) as u32).to_string(),
                    "--stdin".to_string(),
                ]);
                Invocation {
                    program,
                    args,
                    stdin: text.to_string(),
                }
            }
            TtsBackend::PowerShell(_) => {
                let rate = ((settings.rate - 1.0) * 10.0).round().clamp(-10.0, 10.0) as i32;
                let volume = (settings.volume * 100.0).round().clamp(0.0, 100.0) as u32;
                let select = voice
                    .map(|v| format!("try {{ $s.SelectVoice('{}') }} catch {{}}; ", v.id.replace('\'', "''")))
                    .unwrap_or_default();
                let script = format!(
                    "Add-Type -AssemblyName System.Speech; \
                     $s = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
                     $s.Rate = {rate}; $s.Volume = {volume}; {select}\
                     $s.Speak([Console]::In.ReadToEnd())"
                );
                Invocation {
                    program,
                    args: vec![
                        "-NoProfile".into(),
                        "-NonInteractive".into(),
                        "-Command".into(),
                        script,
                    ],
                    stdin: text.to_string(),
                }
            }
        }
    }

    /// Ask the command for its installed voices.
    pub fn list_voices(&self) -> Vec<Voice> {
        let (args, parse): (Vec<&str>, fn(&str) -> Vec<Voice>) = match self {
            TtsBackend::Say(_) => (vec!["-v", "?"], parse_say_voices),
            TtsBackend::Espeak(_) => (vec!["--voices"], parse_espeak_voices),
            TtsBackend::PowerShell(_) => (
                vec![
                    "-NoProfile",
                    "-NonInteractive",
                    "-Command",
                    "Add-Type -AssemblyName System.Speech; \
                     (New-Object System.Speech.Synthesis.SpeechSynthesizer).GetInstalledVoices() | \
                     ForEach-Object { $_.VoiceInfo.Name + '|' + $_.VoiceInfo.Culture.Name }",
                ],
                parse_powershell_voices,
            ),
        };

        match Command::new(self.program()).args(&args).output() {
            Ok(out) if out.status.success() => parse(&String::from_utf8_lossy(&out.stdout)),
            Ok(out) => {
                log::warn!("Voice listing exited with {}", out.status);
                Vec::new()
            }
            Err(e) => {
                log::warn!("Voice listing failed: {e}");
                Vec::new()
            }
        }
    }
}

/// `say` and espeak both default to about 175 words per minute.
fn words_per_minute(rate: f32) -> u32 {
    (175.0 * rate.clamp(0.1, 10.0)).round() as u32
}

fn find_program(name: &str) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        let exe = dir.join(format!("{name}.exe"));
        (cfg!(windows) && exe.is_file()).then_some(exe)
    })
}

// ---------------------------------------------------------------------------
// Voice list parsers
// ---------------------------------------------------------------------------

/// `say -v ?` lines: `Samantha            en_US    # Hello, my name is …`
pub fn parse_say_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim();
            let (name, lang) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            (!name.is_empty()).then(|| Voice::new(name, name, lang.trim()))
        })
        .collect()
}

/// `espeak-ng --voices` table; voices with female gender are labelled so
/// they can be matched by name.
pub fn parse_espeak_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 5 {
                return None;
            }
            let lang = cols[1];
            let mut name = cols[3].replace('_', " ");
            if cols[2].ends_with('F') {
                name.push_str(" (female)");
            }
            Some(Voice::new(lang, name, lang))
        })
        .collect()
}

/// `Name|Culture` lines from the PowerShell listing.
pub fn parse_powershell_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let (name, culture) = line.trim().split_once('|')?;
            Some(Voice::new(name, name, culture))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CommandSynthesizer
// ---------------------------------------------------------------------------

/// [`SpeechSynthesizer`] that runs a [`TtsBackend`] as a child process.
pub struct CommandSynthesizer {
    backend: Option<TtsBackend>,
    child: Arc<Mutex<Option<Child>>>,
    generation: Arc<AtomicU64>,
}

impl CommandSynthesizer {
    pub fn new(backend: Option<TtsBackend>) -> Self {
        match &backend {
            Some(b) => log::info!("Speech synthesis via {}", b.program().display()),
            None => log::warn!("No speech synthesis command found; replies will not be spoken"),
        }
        Self {
            backend,
            child: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn detect(override_command: Option<&str>) -> Self {
        Self::new(TtsBackend::detect(override_command))
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn is_available(&self) -> bool {
        self.backend
            .as_ref()
            .is_some_and(|b| b.program().is_file())
    }

    fn voices(&self) -> Vec<Voice> {
        self.backend
            .as_ref()
            .map(TtsBackend::list_voices)
            .unwrap_or_default()
    }

    fn speak(
        &mut self,
        text: &str,
        voice: Option<&Voice>,
        settings: UtteranceSettings,
        on_done: DoneCallback,
    ) -> Result<(), SynthesisError> {
        let backend = self.backend.clone().ok_or(SynthesisError::Unavailable)?;
        self.cancel();

        let invocation = backend.invocation(text, voice, settings);
        let mut child = invocation
            .command()
            .spawn()
            .map_err(|e| SynthesisError::Spawn(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(invocation.stdin.as_bytes()) {
                log::warn!("Failed to pass text to speech command: {e}");
            }
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut slot) = self.child.lock() {
            *slot = Some(child);
        }

        let slot = Arc::clone(&self.child);
        let current = Arc::clone(&self.generation);
        std::thread::Builder::new()
            .name("speech-output".into())
            .spawn(move || watch_child(slot, current, generation, on_done))
            .map_err(|e| SynthesisError::Spawn(e.to_string()))?;
        Ok(())
    }

    fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let child = match self.child.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(mut child) = child {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn watch_child(
    slot: Arc<Mutex<Option<Child>>>,
    current: Arc<AtomicU64>,
    generation: u64,
    on_done: DoneCallback,
) {
    loop {
        std::thread::sleep(Duration::from_millis(40));
        let Ok(mut guard) = slot.lock() else { return };
        if current.load(Ordering::SeqCst) != generation {
            return;
        }
        let Some(child) = guard.as_mut() else { return };
        match child.try_wait() {
            Ok(Some(status)) => {
                *guard = None;
                drop(guard);
                if !status.success() {
                    log::warn!("Speech command exited with {status}");
                }
                on_done(status.success());
                return;
            }
            Ok(None) => {}
            Err(e) => {
                *guard = None;
                drop(guard);
                log::warn!("Lost track of speech command: {e}");
                on_done(false);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn say_voices_are_parsed() {
        let out = "Alex                en_US    # Most people recognize me by my voice.\n\
                   Bad News            en_US    # The light you see at the end of the tunnel.\n\
                   Samantha            en_US    # Hello, my name is Samantha.\n\
                   Thomas              fr_FR    # Bonjour, je m'appelle Thomas.\n";
        let voices = parse_say_voices(out);
        assert_eq!(voices.len(), 4);
        assert_eq!(voices[1], Voice::new("Bad News", "Bad News", "en_US"));
        assert_eq!(voices[3].lang, "fr_FR");
    }

    #[test]
    fn espeak_voices_are_parsed() {
        let out = "Pty Language       Age/Gender VoiceName          File                 Other Languages\n \
                   5  af              --/M      Afrikaans          gmw/af\n \
                   2  en-gb           --/M      English_(Great_Britain) gmw/en            (en 2)\n \
                   5  en-us           --/F      English_(America)  gmw/en-US           (en 3)\n";
        let voices = parse_espeak_voices(out);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[1].name, "English (Great Britain)");
        assert_eq!(voices[2].name, "English (America) (female)");
        assert_eq!(voices[2].id, "en-us");
        assert!(voices[2].is_english());
    }

    #[test]
    fn powershell_voices_are_parsed() {
        let voices = parse_powershell_voices("Microsoft David Desktop|en-US\r\nMicrosoft Zira Desktop|en-US\r\n");
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[1].name, "Microsoft Zira Desktop");
    }

    #[test]
    fn espeak_invocation_maps_prosody() {
        let backend = TtsBackend::Espeak(PathBuf::from("/usr/bin/espeak-ng"));
        let voice = Voice::new("en-us", "English (America)", "en-us");
        let inv = backend.invocation("-hello", Some(&voice), UtteranceSettings::default());
        assert_eq!(
            inv.args,
            vec!["-v", "en-us", "-s", "158", "-p", "55", "-a", "100", "--stdin"]
        );
        assert_eq!(inv.stdin, "-hello");
    }

    #[test]
    fn say_invocation_embeds_volume() {
        let backend = TtsBackend::Say(PathBuf::from("/usr/bin/say"));
        let inv = backend.invocation("Hi there", None, UtteranceSettings::default());
        assert_eq!(inv.args, vec!["-r", "158"]);
        assert_eq!(inv.stdin, "[[volm 1.00]] Hi there");
    }

    #[test]
    fn powershell_invocation_escapes_voice_name() {
        let backend = TtsBackend::PowerShell(PathBuf::from("powershell"));
        let voice = Voice::new("O'Brien", "O'Brien", "en-IE");
        let inv = backend.invocation("Hi", Some(&voice), UtteranceSettings::default());
        let script = inv.args.last().unwrap();
        assert!(script.contains("$s.Rate = -1"));
        assert!(script.contains("$s.Volume = 100"));
        assert!(script.contains("SelectVoice('O''Brien')"));
    }

    #[test]
    fn backend_inferred_from_program_name() {
        assert!(matches!(TtsBackend::from_program("/usr/bin/say".into()), TtsBackend::Say(_)));
        assert!(matches!(TtsBackend::from_program("/usr/bin/pwsh".into()), TtsBackend::PowerShell(_)));
        assert!(matches!(TtsBackend::from_program("/opt/espeak".into()), TtsBackend::Espeak(_)));
    }

    #[test]
    fn missing_backend_is_unavailable() {
        let mut synth = CommandSynthesizer::new(None);
        assert!(!synth.is_available());
        assert!(synth.voices().is_empty());
        let err = synth
            .speak("hi", None, UtteranceSettings::default(), Box::new(|_| {}))
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Unavailable));
        synth.cancel();
    }

    #[cfg(unix)]
    fn watch_exit_of(script: &str) -> Option<bool> {
        let child = Command::new("sh").args(["-c", script]).spawn().unwrap();
        let slot = Arc::new(Mutex::new(Some(child)));
        let current = Arc::new(AtomicU64::new(1));
        let (tx, rx) = std::sync::mpsc::channel();
        watch_child(Arc::clone(&slot), current, 1, Box::new(move |ok| tx.send(ok).unwrap()));
        assert!(slot.lock().unwrap().is_none());
        rx.try_recv().ok()
    }

    #[cfg(unix)]
    #[test]
    fn watcher_reports_clean_exit_as_finished() {
        assert_eq!(watch_exit_of("exit 0"), Some(true));
    }

    #[cfg(unix)]
    #[test]
    fn watcher_reports_failed_command() {
        assert_eq!(watch_exit_of("exit 3"), Some(false));
    }

    #[cfg(unix)]
    #[test]
    fn watcher_stays_quiet_after_cancel() {
        let child = Command::new("sh").args(["-c", "exit 0"]).spawn().unwrap();
        let slot = Arc::new(Mutex::new(Some(child)));
        let current = Arc::new(AtomicU64::new(2));
        let (tx, rx) = std::sync::mpsc::channel();
        watch_child(Arc::clone(&slot), current, 1, Box::new(move |ok| tx.send(ok).unwrap()));
        assert!(rx.try_recv().is_err());
        if let Some(mut child) = slot.lock().unwrap().take() {
            let _ = child.wait();
        };
    }
}
