// SPDX-License-Identifier: MPL-2.0
//! Locale-specific instructions sent alongside the photo.
//!
//! Each prompt asks for the same five sections, in order: species or breed
//! (only when confident), visual cues, life stage (juvenile/adult/senior),
//! three to five care tips, and an uncertainty or safety note. When the
//! subject is not a pet the model is told to describe the main subject
//! instead. The answer is never parsed; the structure only guides the model.

use crate::i18n::Locale;

const PROMPT_EN: &str = "You are a pet expert. Identify the pet in the photo.
Return:
1) Species/Breed (only if confident)
2) Key visual cues
3) Likely life stage (juvenile/adult/senior)
4) Care tips (3-5 bullets)
5) Uncertainty and safety note

If it is not a pet, say what the main subject is.";

const PROMPT_ZH: &str = "你是宠物专家。请识别照片中的宠物。
按以下结构输出：
1）物种/品种（有把握再写）
2）关键视觉依据
3）可能年龄阶段（幼年/成年/老年）
4）饲养与护理建议（3-5条）
5）不确定性与安全提示

如果不是宠物，请说明主要内容。";

const PROMPT_KO: &str = "당신은 반려동물 전문가입니다. 사진 속 반려동물을 식별하세요.
다음 구조로 답변:
1) 종/품종(확신할 때만)
2) 핵심 시각적 근거
3) 추정 연령 단계(유년/성년/노년)
4) 사육·관리 팁(3-5개)
5) 불확실성 및 안전 안내

반려동물이 아니면 주요 피사체를 설명하세요.";

/// Returns the instruction block for `locale`.
pub fn build(locale: Locale) -> &'static str {
    match locale {
        Locale::En => PROMPT_EN,
        Locale::Zh => PROMPT_ZH,
        Locale::Ko => PROMPT_KO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_locale_has_five_ordered_sections() {
        for locale in Locale::ALL {
            let prompt = build(locale);
            let mut last = 0;
            for section in 1..=5 {
                let position = [format!("\n{section})"), format!("\n{section}）")]
                    .iter()
                    .filter_map(|marker| prompt.find(marker.as_str()))
                    .min()
                    .unwrap_or_else(|| panic!("{locale} prompt lacks section {section}"));
                assert!(position > last, "{locale} section {section} out of order");
                last = position;
            }
        }
    }

    #[test]
    fn prompts_differ_per_locale() {
        assert_ne!(build(Locale::En), build(Locale::Zh));
        assert_ne!(build(Locale::Zh), build(Locale::Ko));
        assert_ne!(build(Locale::En), build(Locale::Ko));
    }

    #[test]
    fn english_prompt_names_the_closed_life_stage_set() {
        assert!(build(Locale::En).contains("juvenile/adult/senior"));
        assert!(build(Locale::En).contains("not a pet"));
    }
}
