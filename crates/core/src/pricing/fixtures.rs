use crate::domain::recommendation::{MixerSpec, MonitorSpec, Recommendation, SpeakerSpec};

pub(crate) fn recommendation(main: i64, subs: i64, monitors: Option<i64>) -> Recommendation {
    Recommendation {
        main_speakers: SpeakerSpec {
            quantity: main,
            kind: "15 pulgadas activo".to_string(),
            power: "1000W RMS".to_string(),
        },
        subwoofers: SpeakerSpec {
            quantity: subs,
            kind: "18 pulgadas activo".to_string(),
            power: "1200W RMS".to_string(),
        },
        monitors: monitors
            .map(|quantity| MonitorSpec { quantity, kind: "12 pulgadas activo".to_string() }),
        mixer: MixerSpec { kind: "Digital".to_string(), channels: 8 },
        explanation: "Configuración pensada para música con graves marcados.".to_string(),
        placement_suggestion: "Subwoofer centrado al frente del escenario.".to_string(),
    }
}
