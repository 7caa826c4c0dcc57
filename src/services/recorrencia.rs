//! Geração de datas de ocorrência para regras de recorrência.
//!
//! Função pura: mesma regra, mesmas datas. O chamador (preview da UI ou o
//! job de materialização) decide o que fazer com as datas.
//!
//! Semântica do `intervalo` em regras semanais: é o passo entre dias
//! EXAMINADOS, não entre semanas. Com `intervalo = 2` o motor examina dia
//! sim, dia não, e emite quando o dia examinado cai num dos `dias_semana`.
//!
//! Mês sem o `dia_do_mes` (ex.: 31 em fevereiro) é pulado, nunca ajustado
//! para o último dia do mês; a âncora do dia nunca deriva.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Frequencia, RegraRecorrencia};
use crate::utils::{AppError, AppResult};

/// Limite de candidatos examinados por chamada (~10 anos em resolução
/// diária). Garante término em regras degeneradas, como semanal sem nenhum
/// dia marcado.
const MAX_CANDIDATOS: u32 = 3_660;

/// Próximas `quantidade` datas de ocorrência da regra, a partir de
/// `data_inicio` (inclusive). Pode devolver menos que `quantidade` quando a
/// regra termina (`data_fim`) ou o limite de varredura é atingido; exaustão
/// não é erro.
pub fn proximas_ocorrencias(
    regra: &RegraRecorrencia,
    quantidade: usize,
) -> AppResult<Vec<NaiveDate>> {
    validar_regra(regra)?;
    coletar(regra, quantidade, regra.data_inicio)
}

/// Primeira ocorrência em `dia` ou depois dele. `None` quando a regra já
/// terminou ou nada foi encontrado dentro do limite de varredura.
pub fn primeira_ocorrencia_a_partir_de(
    regra: &RegraRecorrencia,
    dia: NaiveDate,
) -> AppResult<Option<NaiveDate>> {
    validar_regra(regra)?;
    let piso = dia.max(regra.data_inicio);
    Ok(coletar(regra, 1, piso)?.into_iter().next())
}

/// Primeiro candidato da série >= `nao_antes_de`, preservando a congruência
/// do passo com `data_inicio`. Sem esse salto, uma regra diária saudável
/// criada anos antes da consulta esgotaria o limite de varredura antes de
/// alcançar a data pedida. `None` quando o salto sai do calendário.
fn primeiro_candidato(regra: &RegraRecorrencia, nao_antes_de: NaiveDate) -> Option<NaiveDate> {
    let passo = i64::from(regra.intervalo);
    let atraso = (nao_antes_de - regra.data_inicio).num_days();
    if atraso <= 0 {
        return Some(regra.data_inicio);
    }
    let saltos = (atraso + passo - 1) / passo;
    regra.data_inicio.checked_add_signed(Duration::days(saltos * passo))
}

fn validar_regra(regra: &RegraRecorrencia) -> AppResult<()> {
    if regra.intervalo < 1 {
        return Err(AppError::RegraInvalida("intervalo deve ser >= 1".to_string()));
    }
    if regra.frequencia == Frequencia::Mensal {
        match regra.dia_do_mes {
            Some(dia) if (1..=31).contains(&dia) => {}
            Some(dia) => {
                return Err(AppError::RegraInvalida(format!(
                    "dia_do_mes fora do intervalo 1-31: {}",
                    dia
                )))
            }
            None => {
                return Err(AppError::RegraInvalida(
                    "regra mensal exige dia_do_mes".to_string(),
                ))
            }
        }
    }
    Ok(())
}

/// Varre os candidatos da regra e devolve as ocorrências >= `nao_antes_de`.
/// A varredura sempre ancora em `data_inicio` para que o passo do intervalo
/// não dependa do ponto de consulta.
fn coletar(
    regra: &RegraRecorrencia,
    quantidade: usize,
    nao_antes_de: NaiveDate,
) -> AppResult<Vec<NaiveDate>> {
    let mut ocorrencias = Vec::new();
    if quantidade == 0 {
        return Ok(ocorrencias);
    }

    match regra.frequencia {
        Frequencia::Diaria => {
            let Some(mut dia) = primeiro_candidato(regra, nao_antes_de) else {
                return Ok(ocorrencias);
            };
            for _ in 0..MAX_CANDIDATOS {
                if passou_do_fim(regra, dia) {
                    break;
                }
                if dia >= nao_antes_de {
                    ocorrencias.push(dia);
                    if ocorrencias.len() == quantidade {
                        break;
                    }
                }
                // passo além do calendário: série esgotada
                dia = match dia.checked_add_signed(Duration::days(i64::from(regra.intervalo))) {
                    Some(proximo) => proximo,
                    None => break,
                };
            }
        }
        Frequencia::Semanal => {
            // dias_semana vazio: nenhum candidato casa; o laço termina no
            // limite de varredura com zero ocorrências
            let Some(mut dia) = primeiro_candidato(regra, nao_antes_de) else {
                return Ok(ocorrencias);
            };
            for _ in 0..MAX_CANDIDATOS {
                if passou_do_fim(regra, dia) {
                    break;
                }
                let dia_da_semana = dia.weekday().num_days_from_sunday() as u8;
                if regra.dias_semana.contains(&dia_da_semana) && dia >= nao_antes_de {
                    ocorrencias.push(dia);
                    if ocorrencias.len() == quantidade {
                        break;
                    }
                }
                dia = match dia.checked_add_signed(Duration::days(i64::from(regra.intervalo))) {
                    Some(proximo) => proximo,
                    None => break,
                };
            }
        }
        Frequencia::Mensal => {
            let dia_alvo = regra
                .dia_do_mes
                .ok_or_else(|| AppError::RegraInvalida("regra mensal exige dia_do_mes".to_string()))?;
            let mut ano = regra.data_inicio.year();
            let mut mes = regra.data_inicio.month();
            for _ in 0..MAX_CANDIDATOS {
                // O mês candidato já começa depois do fim da regra?
                if let Some(primeiro) = NaiveDate::from_ymd_opt(ano, mes, 1) {
                    if passou_do_fim(regra, primeiro) {
                        break;
                    }
                }
                if let Some(data) = NaiveDate::from_ymd_opt(ano, mes, dia_alvo) {
                    if passou_do_fim(regra, data) {
                        break;
                    }
                    if data >= regra.data_inicio && data >= nao_antes_de {
                        ocorrencias.push(data);
                        if ocorrencias.len() == quantidade {
                            break;
                        }
                    }
                }
                // avanço com aritmética verificada: intervalo enorme não
                // deve estourar, apenas esgotar a série
                let meses = match (mes - 1).checked_add(regra.intervalo) {
                    Some(total) => total,
                    None => break,
                };
                ano = match ano.checked_add((meses / 12) as i32) {
                    Some(proximo) => proximo,
                    None => break,
                };
                mes = (meses % 12) + 1;
            }
        }
        Frequencia::Anual => {
            let mes = regra.data_inicio.month();
            let dia_alvo = regra.data_inicio.day();
            let mut ano = regra.data_inicio.year();
            for _ in 0..MAX_CANDIDATOS {
                if regra.data_fim.is_some_and(|fim| ano > fim.year()) {
                    break;
                }
                // 29 de fevereiro em ano não bissexto: o ano é pulado
                if let Some(data) = NaiveDate::from_ymd_opt(ano, mes, dia_alvo) {
                    if passou_do_fim(regra, data) {
                        break;
                    }
                    if data >= nao_antes_de {
                        ocorrencias.push(data);
                        if ocorrencias.len() == quantidade {
                            break;
                        }
                    }
                }
                // checked_add_unsigned: `as i32` embrulharia intervalos
                // acima de i32::MAX em passos negativos
                ano = match ano.checked_add_unsigned(regra.intervalo) {
                    Some(proximo) => proximo,
                    None => break,
                };
            }
        }
    }

    Ok(ocorrencias)
}

fn passou_do_fim(regra: &RegraRecorrencia, data: NaiveDate) -> bool {
    regra.data_fim.is_some_and(|fim| data > fim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn regra(frequencia: Frequencia, inicio: NaiveDate) -> RegraRecorrencia {
        RegraRecorrencia {
            frequencia,
            intervalo: 1,
            dias_semana: BTreeSet::new(),
            dia_do_mes: None,
            data_inicio: inicio,
            data_fim: None,
        }
    }

    #[test]
    fn test_diaria_intervalo_um() {
        let r = regra(Frequencia::Diaria, data(2024, 1, 1));
        let datas = proximas_ocorrencias(&r, 4).unwrap();
        assert_eq!(
            datas,
            vec![data(2024, 1, 1), data(2024, 1, 2), data(2024, 1, 3), data(2024, 1, 4)]
        );
    }

    #[test]
    fn test_diaria_i_esima_ocorrencia_e_inicio_mais_i_vezes_k() {
        let mut r = regra(Frequencia::Diaria, data(2024, 1, 1));
        r.intervalo = 3;
        let datas = proximas_ocorrencias(&r, 5).unwrap();
        for (i, d) in datas.iter().enumerate() {
            assert_eq!(*d, data(2024, 1, 1) + Duration::days(3 * i as i64));
        }
    }

    #[test]
    fn test_semanal_segunda_quarta_sexta() {
        // 2024-01-01 é segunda-feira
        let mut r = regra(Frequencia::Semanal, data(2024, 1, 1));
        r.dias_semana = BTreeSet::from([1, 3, 5]);
        let datas = proximas_ocorrencias(&r, 3).unwrap();
        assert_eq!(datas, vec![data(2024, 1, 1), data(2024, 1, 3), data(2024, 1, 5)]);
    }

    #[test]
    fn test_semanal_toda_ocorrencia_cai_nos_dias_marcados() {
        let mut r = regra(Frequencia::Semanal, data(2024, 1, 1));
        r.dias_semana = BTreeSet::from([0, 2, 6]);
        for d in proximas_ocorrencias(&r, 20).unwrap() {
            assert!(r.dias_semana.contains(&(d.weekday().num_days_from_sunday() as u8)));
        }
    }

    #[test]
    fn test_semanal_intervalo_e_passo_entre_dias_examinados() {
        // Com intervalo 2 o motor examina dia sim, dia não. Partindo de uma
        // segunda e pedindo só segundas, o próximo dia examinado que cai em
        // segunda é 14 dias depois.
        let mut r = regra(Frequencia::Semanal, data(2024, 1, 1));
        r.intervalo = 2;
        r.dias_semana = BTreeSet::from([1]);
        let datas = proximas_ocorrencias(&r, 2).unwrap();
        assert_eq!(datas, vec![data(2024, 1, 1), data(2024, 1, 15)]);
    }

    #[test]
    fn test_semanal_sem_dias_termina_com_zero_ocorrencias() {
        let r = regra(Frequencia::Semanal, data(2024, 1, 1));
        assert_eq!(proximas_ocorrencias(&r, 5).unwrap(), vec![]);
    }

    #[test]
    fn test_mensal_dia_31_pula_fevereiro() {
        let mut r = regra(Frequencia::Mensal, data(2024, 1, 31));
        r.dia_do_mes = Some(31);
        let datas = proximas_ocorrencias(&r, 3).unwrap();
        // Fevereiro e abril não têm dia 31 e são pulados, sem ajuste
        assert_eq!(datas, vec![data(2024, 1, 31), data(2024, 3, 31), data(2024, 5, 31)]);
    }

    #[test]
    fn test_mensal_nao_emite_antes_da_data_inicio() {
        let mut r = regra(Frequencia::Mensal, data(2024, 1, 15));
        r.dia_do_mes = Some(10);
        let datas = proximas_ocorrencias(&r, 2).unwrap();
        assert_eq!(datas, vec![data(2024, 2, 10), data(2024, 3, 10)]);
    }

    #[test]
    fn test_mensal_toda_ocorrencia_cai_no_dia_do_mes() {
        let mut r = regra(Frequencia::Mensal, data(2024, 1, 1));
        r.intervalo = 2;
        r.dia_do_mes = Some(15);
        for d in proximas_ocorrencias(&r, 8).unwrap() {
            assert_eq!(d.day(), 15);
        }
    }

    #[test]
    fn test_mensal_sem_dia_do_mes_rejeitada() {
        let r = regra(Frequencia::Mensal, data(2024, 1, 1));
        assert!(matches!(
            proximas_ocorrencias(&r, 1),
            Err(AppError::RegraInvalida(_))
        ));
    }

    #[test]
    fn test_mensal_dia_fora_de_1_a_31_rejeitado() {
        let mut r = regra(Frequencia::Mensal, data(2024, 1, 1));
        r.dia_do_mes = Some(32);
        assert!(matches!(
            proximas_ocorrencias(&r, 1),
            Err(AppError::RegraInvalida(_))
        ));
        r.dia_do_mes = Some(0);
        assert!(matches!(
            proximas_ocorrencias(&r, 1),
            Err(AppError::RegraInvalida(_))
        ));
    }

    #[test]
    fn test_intervalo_zero_rejeitado() {
        let mut r = regra(Frequencia::Diaria, data(2024, 1, 1));
        r.intervalo = 0;
        assert!(matches!(
            proximas_ocorrencias(&r, 1),
            Err(AppError::RegraInvalida(_))
        ));
    }

    #[test]
    fn test_anual_preserva_mes_e_dia() {
        let mut r = regra(Frequencia::Anual, data(2021, 5, 20));
        r.intervalo = 2;
        let datas = proximas_ocorrencias(&r, 3).unwrap();
        assert_eq!(datas, vec![data(2021, 5, 20), data(2023, 5, 20), data(2025, 5, 20)]);
    }

    #[test]
    fn test_anual_29_de_fevereiro_pula_ano_nao_bissexto() {
        let r = regra(Frequencia::Anual, data(2020, 2, 29));
        let datas = proximas_ocorrencias(&r, 2).unwrap();
        assert_eq!(datas, vec![data(2020, 2, 29), data(2024, 2, 29)]);
    }

    #[test]
    fn test_data_fim_e_limite_inclusivo() {
        let mut r = regra(Frequencia::Diaria, data(2024, 1, 1));
        r.intervalo = 2;
        r.data_fim = Some(data(2024, 1, 5));
        let datas = proximas_ocorrencias(&r, 10).unwrap();
        assert_eq!(datas, vec![data(2024, 1, 1), data(2024, 1, 3), data(2024, 1, 5)]);
    }

    #[test]
    fn test_nunca_devolve_data_fora_dos_limites() {
        let mut r = regra(Frequencia::Semanal, data(2024, 3, 7));
        r.dias_semana = BTreeSet::from([0, 1, 2, 3, 4, 5, 6]);
        r.data_fim = Some(data(2024, 4, 30));
        for d in proximas_ocorrencias(&r, 100).unwrap() {
            assert!(d >= r.data_inicio);
            assert!(d <= r.data_fim.unwrap());
        }
    }

    #[test]
    fn test_quantidade_zero_devolve_vazio() {
        let r = regra(Frequencia::Diaria, data(2024, 1, 1));
        assert_eq!(proximas_ocorrencias(&r, 0).unwrap(), vec![]);
    }

    #[test]
    fn test_primeira_ocorrencia_a_partir_de_respeita_ancora() {
        // A série é 1, 4, 7, 10 de janeiro; consultar a partir do dia 5
        // devolve o dia 7, não o dia 5
        let mut r = regra(Frequencia::Diaria, data(2024, 1, 1));
        r.intervalo = 3;
        let proxima = primeira_ocorrencia_a_partir_de(&r, data(2024, 1, 5)).unwrap();
        assert_eq!(proxima, Some(data(2024, 1, 7)));
    }

    #[test]
    fn test_regra_diaria_antiga_continua_viva() {
        // Regra criada anos antes da consulta: o salto inicial alcança a
        // data pedida sem gastar o limite de varredura na série antiga
        let r = regra(Frequencia::Diaria, data(2014, 1, 1));
        let proxima = primeira_ocorrencia_a_partir_de(&r, data(2026, 8, 29)).unwrap();
        assert_eq!(proxima, Some(data(2026, 8, 29)));
    }

    #[test]
    fn test_salto_inicial_preserva_congruencia_do_passo() {
        // De 2014-01-01 a 2026-08-29 são 4623 dias; com intervalo 7 o
        // próximo múltiplo do passo é 4627 dias = 2026-09-02
        let mut r = regra(Frequencia::Diaria, data(2014, 1, 1));
        r.intervalo = 7;
        let proxima = primeira_ocorrencia_a_partir_de(&r, data(2026, 8, 29)).unwrap();
        assert_eq!(proxima, Some(data(2026, 9, 2)));
    }

    #[test]
    fn test_semanal_antiga_continua_encontrando_dias() {
        let mut r = regra(Frequencia::Semanal, data(2014, 1, 1));
        r.dias_semana = BTreeSet::from([1]);
        // 2026-08-29 é sábado; a segunda-feira seguinte é 2026-08-31
        let proxima = primeira_ocorrencia_a_partir_de(&r, data(2026, 8, 29)).unwrap();
        assert_eq!(proxima, Some(data(2026, 8, 31)));
    }

    #[test]
    fn test_intervalo_gigante_esgota_a_serie_sem_panico() {
        // Um passo de u32::MAX unidades sai do calendário logo após o
        // primeiro candidato; a série termina com uma ocorrência
        let mut diaria = regra(Frequencia::Diaria, data(2024, 1, 1));
        diaria.intervalo = u32::MAX;
        assert_eq!(proximas_ocorrencias(&diaria, 5).unwrap(), vec![data(2024, 1, 1)]);

        let mut mensal = regra(Frequencia::Mensal, data(2024, 1, 1));
        mensal.intervalo = u32::MAX;
        mensal.dia_do_mes = Some(1);
        assert_eq!(proximas_ocorrencias(&mensal, 5).unwrap(), vec![data(2024, 1, 1)]);

        let mut anual = regra(Frequencia::Anual, data(2024, 1, 1));
        anual.intervalo = u32::MAX;
        assert_eq!(proximas_ocorrencias(&anual, 5).unwrap(), vec![data(2024, 1, 1)]);
    }

    #[test]
    fn test_primeira_ocorrencia_depois_do_fim_e_none() {
        let mut r = regra(Frequencia::Diaria, data(2024, 1, 1));
        r.data_fim = Some(data(2024, 1, 10));
        let proxima = primeira_ocorrencia_a_partir_de(&r, data(2024, 2, 1)).unwrap();
        assert_eq!(proxima, None);
    }
}
