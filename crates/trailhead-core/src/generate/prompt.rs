//! Prompt construction for roadmap generation.
//!
//! Two fixed templates, detailed and concise. Both instruct the model to
//! produce the Markdown dialect the parser understands: `#`/`##` headings,
//! `Week N:` milestone lines, and `[label](url)` resource links with
//! ` - description` suffixes.

/// Build the generation prompt for a topic.
///
/// `detailed` selects the staged three-month plan over the short
/// essential-steps overview.
pub fn build_prompt(topic: &str, detailed: bool) -> String {
    if detailed {
        detailed_prompt(topic)
    } else {
        concise_prompt(topic)
    }
}

fn detailed_prompt(topic: &str) -> String {
    format!(
        "Create a comprehensive roadmap to become a {topic}, formatted with clear \
Markdown headings and structured content. Each section must include relevant \
YouTube video links or video course suggestions for that sub-topic.

Organize the roadmap as follows:

# {topic} Roadmap: 3-Month Mastery Plan

## Stage 1: Foundation Building (Weeks 1-4)
Objective: establish core fundamentals.

### Key Concepts:
- List 3-5 fundamental concepts with a one-sentence explanation each
- Provide a YouTube video or course link for each concept

### Tools & Technologies:
- List primary tools with short descriptions
- Provide video tutorials or walkthrough links for each tool

### Learning Resources:
- [Resource Name](URL) - say whether it is a video, course, or article and why it is useful

### Weekly Breakdown:
Week 1: specific focus area
- Daily learning goals and practical exercises
- Video resources for the week
- Weekly milestone to be achieved

## Stage 2: Skill Deepening (Weeks 5-8)
Objective: apply knowledge through hands-on practice. Repeat the same \
structure with detailed learning goals, tools, resources, and videos.

## Final Stage: Portfolio Development (Weeks 9-12)
Objective: build real-world projects to showcase skills.

### Project Examples:
- Project name with a short description, technologies used, relevant video \
tutorials, and the skills gained

## Continuous Learning Path
- Recommended certifications with links
- Advanced video tutorials
- Online communities to join
- Suggested blogs, newsletters, or repositories to follow

Use proper Markdown headings (##, ###). Write weekly milestones as lines \
starting with \"Week N:\". Format every link as [label](url), optionally \
followed by \" - description\". Include at least one video resource per \
major concept or tool."
    )
}

fn concise_prompt(topic: &str) -> String {
    format!(
        "Provide a structured overview to become a {topic}, with clearly divided \
sections. Each section should include at least one YouTube video or free \
online course.

# {topic} Learning Path: Essential Steps

## Step 1: Core Fundamentals
- List 3-5 key concepts with a one-line explanation each
- Add a YouTube video or course link for each concept

## Step 2: Essential Tools
- List the main tools and their purpose
- Include beginner tutorials or video walkthroughs

## Step 3: Learning Resources
- List video-based resources and mention whether each is free or paid

## Step 4: Practice Projects
- List 2-3 project ideas of increasing complexity with a video tutorial for each

## Step 5: Next Steps
- Suggest specialization paths, advanced topics, and online communities

Use standard Markdown (##, ###, -) for formatting. Format every link as \
[label](url), optionally followed by \" - description\". Ensure all links \
are real and provide practical value."
    )
}
