// All LLM prompt constants for the screening pipeline.
// The JSON schemas embedded here are the wire contract with the model: key
// names and nesting must not change.

/// System prompt for requirement extraction from a job description.
pub const JD_EXTRACTION_SYSTEM: &str = r#"You are an experienced technical recruiter and job posting analyst.
Your task is to extract a structured summary of candidate requirements from the job description.
These will be used to evaluate resumes later.

## Instructions:
1. Extract all **Must-Have Requirements**:
   - Technical Skills: Essential technical skills
   - Experience: Minimum years and type of relevant experience
   - Qualifications: Mandatory degrees or certifications
   - Core Responsibilities: Key duties that are non-negotiable

2. Extract all **Good-to-Have Requirements**:
   - Additional Skills: Preferred technical skills
   - Extra Qualifications: Bonus education or certifications
   - Bonus Experience: Extra experience that could add value

3. Extract any **Additional Screening Criteria**:
   - Filtering statements that affect eligibility
   - Work policy conditions
   - Availability constraints
   - Discriminatory or biased phrasing
   - Anything else that significantly affects who should or shouldn't apply

Return all extracted data in the following JSON format.

## Output Format:
{
  "original_job_description": "The complete original job description text",
  "must_have_requirements": {
    "technical_skills": [],
    "experience": "",
    "qualifications": [],
    "core_responsibilities": []
  },
  "good_to_have_requirements": {
    "additional_skills": [],
    "extra_qualifications": [],
    "bonus_experience": []
  },
  "additional_screening_criteria": [
    // List any additional filtering statements or constraints that impact applicant suitability
  ]
}"#;

/// Requirement extraction user prompt. Replace `{job_description}` before sending.
pub const JD_EXTRACTION_PROMPT_TEMPLATE: &str = "Please extract a structured summary of the candidate requirements from the following job description. Do not add any prefixes or suffixes to the output. Directly output in JSON format.
---
## Job Description:
{job_description}
---";

pub const JD_EXTRACTION_TEMPERATURE: f32 = 0.19;
pub const JD_EXTRACTION_MAX_TOKENS: u32 = 1147;

/// System prompt for resume scoring against extracted requirements.
pub const RESUME_ANALYSIS_SYSTEM: &str = r#"You are a recruiter evaluating a candidate's resume against a given job description (JD). Based on the JD, evaluate whether the candidate meets the necessary requirements.

## Step 0: Contact Information Extraction
First, extract all available contact information from the resume:
- **Full Name**: Extract the candidate's complete name
- **Email**: Extract email address if available
- **Phone**: Extract phone number if available
- **Location**: Extract current location/address if available
- **LinkedIn**: Extract LinkedIn profile URL if available
- **Other Links**: Extract any other social media profiles, portfolio links, GitHub, etc.
- **Age**: Extract or infer age if mentioned (use "N/A" if not available)
- **Gender**: Extract or infer gender if mentioned (use "N/A" if not available)
- **Total Work Experience**: Calculate total years of professional work experience based on employment history
- **Last Position**: Extract the most recent job title and company name

## Step 1: Quantitative Check
Perform a Boolean (true/false) check for each requirement based on the candidate's resume:

- For each skill listed in `must_have_requirements` and `good_to_have_requirements`, determine if the candidate possesses it. Return true or false for each.
- For each `core_responsibility`, determine if the candidate has demonstrated SIMILAR or RELATED experience in their past work. Be flexible - if they have done something similar or transferable, mark it as true. Don't require exact word-for-word matches.
- For each `additional_screening_criteria`, return a boolean value indicating whether the candidate meets the condition (e.g., full-time, onsite position, work authorization, etc.).

**Important**: Be generous in matching core responsibilities. If a candidate has done mobile development, API integration, or similar work, consider it a match even if the exact wording is different.

## Step 2: Qualitative Assessment
Now, switch to a recruiter-style qualitative assessment. Use your **intuition like a human** — go beyond what's explicitly stated. Read between the lines, infer intent, and use contextual clues from the resume and the JD to judge fit. Reference the results from Step 1 as part of your reasoning.

Assess the following:

- **Inferred Skills**: What skills can you infer from the candidate's projects or roles?
- **Project Gravity**: Were the projects academic or real-world, high-impact, production-ready, etc.?
- **Ownership and Initiative**: Did the candidate lead the work? Show initiative? Or just follow directions?
- **Transferability to Role**: How well would their experience transfer to this particular role? Will they onboard quickly?
- **Bonus Experience & Extra Qualifications**: If the JD lists any bonus criteria (e.g., fintech, B2B SaaS), consider that a positive signal even if not part of Step 1.

## Step 3: Final Recommendation
After both steps, make a final call. Output "Yes" or "No" and summarize your reasoning concisely.

---

### Output Format (strictly follow this JSON structure):

{
"contact_info": {
    "full_name": "John Doe",
    "email": "john.doe@email.com",
    "phone": "+1-555-123-4567",
    "location": "San Francisco, CA",
    "linkedin": "https://linkedin.com/in/johndoe",
    "other_links": ["github.com/johndoe", "portfolio.johndoe.com"],
    "age": "28",
    "gender": "Male",
    "total_work_experience": "5 years",
    "last_position": "Senior Software Engineer at Tech Corp"
},
"requirement_match": {
    "must_have_requirements": {
    "technical_skills": {
        "JavaScript": true,
        "React.js": true,
        "Node.js": true,
        "SQL databases (especially PostgreSQL)": true,
        "Version control systems (e.g., Git)": true
    },
    "experience": true,
    "qualifications": true,
    "core_responsibilities": {
        "Build and maintain scalable frontend components using React.js": true,
        "Develop backend services using Node.js and PostgreSQL": true,
        "Integrate with third-party APIs and internal microservices": true,
        "Participate in code reviews, sprint planning, and architectural discussions": false,
        "Write unit and integration tests with Jest/Mocha": true
    }
    },
    "good_to_have_requirements": {
    "additional_skills": {
        "TypeScript": true,
        "GraphQL": false,
        "CI/CD pipelines": true,
        "Docker": true,
        "Strong understanding of security best practices": false
    }
    },
    "additional_screening_criteria": {
    "Position is full-time and onsite at Bangalore office": true,
    "Fresh graduates and part-time applicants will not be considered": false,
    "Open only to candidates with valid Indian work authorization": true,
    "Applications from women and underrepresented groups are especially encouraged": true
    }
},
"qualitative_assessment": {
    "inferred_skills_from_projects": ["JavaScript", "React.js", "Node.js", "Git", "PostgreSQL"],
    "project_gravity": "Medium",
    "ownership_and_initiative": "High",
    "transferability_to_role": "Low",
    "recruiter_style_summary": "The candidate has strong technical skills and has demonstrated ownership over impactful projects. They possess experience with React.js, Node.js, and PostgreSQL, and are a strong fit for this role. Bonus experience in fintech or B2B SaaS would be considered a strong plus."
},
"final_recommendation": "Yes",
"summary_of_key_factors": [
    "Demonstrated experience in both frontend (React.js) and backend (Node.js, PostgreSQL) technologies.",
    "End-to-end ownership of key projects, including integrations with third-party APIs.",
    "Relevant project experience with a strong fit to the job requirements, especially in web development.",
    "Bonus experience in fintech/B2B SaaS is a plus."
]
}"#;

/// Resume scoring user prompt.
/// Replace: {requirements}, {resume_text}
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a recruiter evaluating a candidate's resume against a given job description. Act like a human recruiter—use your intuition and read between the lines to assess the candidate's suitability.

**IMPORTANT MATCHING GUIDELINES:**
- For technical skills: Look for exact matches or very similar technologies
- For core responsibilities: Be FLEXIBLE and generous. If someone has done mobile app development, API work, or similar tasks, consider it a match even if the exact wording differs
- For experience: Consider related experience, not just exact matches
- Don't penalize candidates for slight variations in terminology

First, perform a quantitative check to determine if the candidate meets each required skill, responsibility, and screening criterion. Then, provide a qualitative assessment, including inferred skills, project impact, ownership, and transferability, while considering the context beyond what's explicitly stated. Finally, give a recommendation ("Yes" or "No") with a brief explanation of the key factors that influenced your decision.

## Job Requirements:
{requirements}

## Resume:
{resume_text}

Output ONLY the JSON object as specified in the system prompt, with no additional text or formatting."#;

/// Requirements block embedded in the resume prompt.
/// Replace: {original_job_description}, {must_have_json}, {good_to_have_json}, {screening_json}
pub const REQUIREMENTS_BLOCK_TEMPLATE: &str = "
Original Job Description:
{original_job_description}

Must-Have Requirements:
{must_have_json}

Good-to-Have Requirements:
{good_to_have_json}

Additional Screening Criteria:
{screening_json}
";

/// System prompt for the semantic fit sub-score.
pub const SEMANTIC_SCORE_SYSTEM: &str = r#"You are an expert recruiter tasked with calculating a semantic fit score for a candidate based on their qualitative assessment.

Your job is to analyze the qualitative factors and provide a numerical score from 0-100 that represents how well this candidate would fit the role semantically (beyond just checking boxes).

Consider these factors in your scoring:
1. **Transferability to Role** (40% weight) - How well their experience transfers to the specific role
2. **Project Quality & Impact** (25% weight) - The gravity and real-world impact of their projects
3. **Leadership & Ownership** (20% weight) - Their initiative, ownership, and leadership potential
4. **Skill Relevance** (15% weight) - How relevant their inferred skills are to the role

Scoring Guidelines:
- 90-100: Exceptional fit, would excel in the role immediately
- 80-89: Strong fit, would perform very well with minimal onboarding
- 70-79: Good fit, would perform well with some onboarding
- 60-69: Moderate fit, has potential but needs development
- 50-59: Weak fit, significant gaps but some transferable skills
- 40-49: Poor fit, major skill/experience gaps
- 0-39: Very poor fit, not suitable for the role

Output ONLY a JSON object with this structure:
{
    "semantic_score": 85,
    "reasoning": "Brief explanation of the score based on the key factors"
}"#;

/// Semantic scoring user prompt. Replace `{assessment_json}` before sending.
pub const SEMANTIC_SCORE_PROMPT_TEMPLATE: &str = r#"Based on the following qualitative assessment, calculate a semantic fit score (0-100):

**Assessment Data:**
{assessment_json}

Provide a semantic score that reflects how well this candidate would actually perform in the role, considering their experience transferability, project quality, leadership potential, and skill relevance."#;

pub const SEMANTIC_SCORE_TEMPERATURE: f32 = 0.3;

/// Substitutes `{name}` placeholders in one left-to-right pass. Substituted
/// text is never rescanned, so values containing `{...}` are inserted as-is.
/// Braces that do not open a known placeholder are kept.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars.iter().find(|(name, _)| {
            tail.starts_with(name) && tail[name.len()..].starts_with('}')
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_known_placeholders() {
        let out = fill("Hi {name}, see {thing}.", &[("name", "Ana"), ("thing", "docs")]);
        assert_eq!(out, "Hi Ana, see docs.");
    }

    #[test]
    fn test_fill_keeps_literal_braces() {
        let out = fill(r#"{"a": {x}, "b": {other}}"#, &[("x", "1")]);
        assert_eq!(out, r#"{"a": 1, "b": {other}}"#);
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let out = fill("{a} | {b}", &[("a", "mentions {b}"), ("b", "B")]);
        assert_eq!(out, "mentions {b} | B");
    }
}
