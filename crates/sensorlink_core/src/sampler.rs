//! Thread de amostragem – lê os três sensores a cada tick, filtra e grava no
//! conjunto compartilhado.
//!
//! Cada sensor é isolado: a falha de um é logada e deixa apenas os seus
//! campos intocados neste tick.

use crate::cadence::TICK;
use crate::filter::PreviousValueMemo;
use crate::sensors::{ColorSensorPointer, PressureTempSensorPointer, TempHumiditySensorPointer};
use crate::shared::SharedReadingSetPointer;
use crate::shutdown::Shutdown;
use crate::time::ClockPointer;
use crate::types::{Reading, Rgb888};
use std::thread::JoinHandle;
use tracing::{error, info};

pub struct SamplingLoop {
    shared: SharedReadingSetPointer,
    sensor_a: TempHumiditySensorPointer,
    sensor_b: PressureTempSensorPointer,
    color: ColorSensorPointer,
    clock: ClockPointer,
    memo: PreviousValueMemo,
}

impl SamplingLoop {
    pub fn new(
        shared: SharedReadingSetPointer,
        sensor_a: TempHumiditySensorPointer,
        sensor_b: PressureTempSensorPointer,
        color: ColorSensorPointer,
        clock: ClockPointer,
    ) -> Self {
        Self {
            shared,
            sensor_a,
            sensor_b,
            color,
            clock,
            memo: PreviousValueMemo::default(),
        }
    }

    /// Um ciclo completo de leitura → filtro → escrita, sob um único lock.
    ///
    /// Retorna a cópia do conjunto logada no diagnóstico.
    pub fn tick(&mut self) -> Reading {
        let Self {
            shared,
            sensor_a,
            sensor_b,
            color,
            memo,
            ..
        } = self;

        shared.update(|set| {
            // ── Sensor A: temperatura + umidade ──
            match sensor_a.read() {
                Ok((temp, humi)) => {
                    set.temp1 = memo.temp1.observe(temp);
                    set.humidity = memo.humidity.observe(humi);
                }
                Err(e) => error!("Sensor A (temp/umidade) falhou: {e}"),
            }

            // ── Sensor B: pressão + temperatura ──
            match sensor_b.read() {
                Ok((press, temp)) => {
                    set.temp2 = memo.temp2.observe(temp);
                    set.pressure = memo.pressure.observe(press);
                }
                Err(e) => error!("Sensor B (pressão/temp) falhou: {e}"),
            }

            // ── Cor: sem filtro ──
            match color.read() {
                Ok(rgb) => set.rgb888 = Rgb888(rgb & 0x00FF_FFFF),
                Err(e) => error!("Sensor de cor falhou: {e}"),
            }

            info!("{set}");
            *set
        })
    }

    /// Loop infinito de amostragem, um tick por segundo.
    pub fn run(mut self, shutdown: Shutdown) {
        info!("Amostragem iniciada");
        while !shutdown.is_triggered() {
            let cycle_start = self.clock.now();
            self.tick();

            // Dormir pelo tempo restante do intervalo
            let elapsed = self.clock.now().saturating_sub(cycle_start);
            if elapsed < TICK {
                self.clock.sleep(TICK - elapsed);
            }
        }
        info!("Amostragem encerrada");
    }

    /// Inicia a thread de amostragem.
    pub fn spawn(self, shutdown: Shutdown) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("sampler".into())
            .spawn(move || self.run(shutdown))
    }
}
